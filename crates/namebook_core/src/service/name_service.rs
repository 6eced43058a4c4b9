//! Name use-case service.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Timestamps are taken from the wall clock at call time.

use crate::model::name::{NameId, NameRecord, NewName};
use crate::repo::name_repo::{NameRepository, RepoResult};
use chrono::Utc;
use log::info;

/// Use-case service wrapper for name records.
pub struct NameService<R: NameRepository> {
    repo: R,
}

impl<R: NameRepository> NameService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a validated name and returns the stored record.
    pub fn create_name(&self, name: &NewName) -> RepoResult<NameRecord> {
        let record = self.repo.create_name(name, Utc::now())?;
        info!(
            "event=name_create module=service status=ok id={}",
            record.id
        );
        Ok(record)
    }

    pub fn get_name(&self, id: NameId) -> RepoResult<Option<NameRecord>> {
        self.repo.get_name(id)
    }

    /// Lists every stored record in insertion order.
    pub fn list_names(&self) -> RepoResult<Vec<NameRecord>> {
        self.repo.list_names()
    }
}
