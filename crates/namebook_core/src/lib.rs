//! Core domain logic for Namebook.
//! This crate is the single source of truth for name record invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::name::{
    FieldIssue, FieldIssueKind, NameField, NameId, NameRecord, NameValidationError, NewName,
};
pub use repo::name_repo::{NameRepository, RepoError, RepoResult, SqliteNameRepository};
pub use service::name_service::NameService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
