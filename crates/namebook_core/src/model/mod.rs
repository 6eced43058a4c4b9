//! Domain model for stored name records.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own boundary validation for incoming name pairs.
//!
//! # Invariants
//! - Every record is identified by a server-assigned `NameId`.
//! - Records are append-only; nothing in core mutates a stored record.

pub mod name;
