//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths only accept validated `NewName` input.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod name_repo;
