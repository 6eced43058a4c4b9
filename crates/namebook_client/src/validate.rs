//! Local pre-submit checks.
//!
//! Both checks run against the client's cached list only, so they are
//! advisory: a stale cache can miss duplicates created elsewhere.

use namebook_core::{NameRecord, NewName};
use thiserror::Error;

use crate::state::NameDraft;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Both first name and last name are required")]
    MissingField,
    #[error("A person with this first and last name already exists")]
    Duplicate,
}

/// Trims the draft, requires both fields, and rejects case-insensitive
/// duplicates of any cached record.
pub fn validate_draft(draft: &NameDraft, cached: &[NameRecord]) -> Result<NewName, DraftError> {
    let name =
        NewName::new(&draft.first_name, &draft.last_name).map_err(|_| DraftError::MissingField)?;

    if cached
        .iter()
        .any(|record| record.matches_pair(name.first_name(), name.last_name()))
    {
        return Err(DraftError::Duplicate);
    }

    Ok(name)
}
