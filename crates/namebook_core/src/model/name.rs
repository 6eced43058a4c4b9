//! Name record domain model.
//!
//! # Responsibility
//! - Define the persisted `NameRecord` and the validated `NewName` input.
//! - Produce field-level validation errors for the API boundary.
//!
//! # Invariants
//! - `first_name` and `last_name` are never empty once wrapped in `NewName`.
//! - `id` and `created_at` are assigned by storage and never change.
//! - `updated_at` equals `created_at` because records are never edited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Server-assigned identifier, monotonic within one database.
pub type NameId = i64;

/// One stored first/last name entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub id: NameId,
    pub first_name: String,
    pub last_name: String,
    /// Serialized as RFC 3339 UTC.
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NameRecord {
    /// Case-insensitive comparison against a first/last pair.
    ///
    /// Used for advisory duplicate checks; storage itself never rejects
    /// duplicates.
    pub fn matches_pair(&self, first_name: &str, last_name: &str) -> bool {
        self.first_name.to_lowercase() == first_name.to_lowercase()
            && self.last_name.to_lowercase() == last_name.to_lowercase()
    }
}

/// Input field of the create operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NameField {
    FirstName,
    LastName,
}

impl NameField {
    /// Wire key used in JSON bodies and error maps.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::FirstName => "first name",
            Self::LastName => "last name",
        }
    }
}

/// Why a single field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldIssueKind {
    /// Missing, null, or blank after trimming.
    Required,
    /// Present but not a string value.
    NotAString,
}

/// One rejected field with its reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: NameField,
    pub kind: FieldIssueKind,
}

impl FieldIssue {
    pub fn required(field: NameField) -> Self {
        Self {
            field,
            kind: FieldIssueKind::Required,
        }
    }

    pub fn not_a_string(field: NameField) -> Self {
        Self {
            field,
            kind: FieldIssueKind::NotAString,
        }
    }

    /// Human-readable message, e.g. `The first name field is required.`
    pub fn message(&self) -> String {
        match self.kind {
            FieldIssueKind::Required => format!("The {} field is required.", self.field.label()),
            FieldIssueKind::NotAString => {
                format!("The {} field must be a string.", self.field.label())
            }
        }
    }
}

/// Validation failure for a create request; lists every failing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameValidationError {
    issues: Vec<FieldIssue>,
}

impl NameValidationError {
    /// Builds an error from collected issues, sorted by field.
    ///
    /// Returns `None` when `issues` is empty.
    pub fn from_issues(mut issues: Vec<FieldIssue>) -> Option<Self> {
        if issues.is_empty() {
            return None;
        }
        issues.sort_by_key(|issue| issue.field);
        Some(Self { issues })
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    pub fn fails(&self, field: NameField) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

impl Display for NameValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let first = self.issues[0].message();
        match self.issues.len() {
            1 => write!(f, "{first}"),
            n => write!(f, "{first} (and {} more error)", n - 1),
        }
    }
}

impl Error for NameValidationError {}

/// Validated input for the create operation.
///
/// Both fields are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewName {
    first_name: String,
    last_name: String,
}

impl NewName {
    /// Trims and validates a first/last pair.
    ///
    /// # Errors
    /// - Returns `NameValidationError` naming each field that is blank.
    pub fn new(
        first_name: impl AsRef<str>,
        last_name: impl AsRef<str>,
    ) -> Result<Self, NameValidationError> {
        Self::from_optional(Some(first_name.as_ref()), Some(last_name.as_ref()))
    }

    /// Same as [`NewName::new`] but treats `None` as a missing field.
    pub fn from_optional(
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<Self, NameValidationError> {
        let first = first_name.map(str::trim).unwrap_or_default();
        let last = last_name.map(str::trim).unwrap_or_default();

        let mut issues = Vec::new();
        if first.is_empty() {
            issues.push(FieldIssue::required(NameField::FirstName));
        }
        if last.is_empty() {
            issues.push(FieldIssue::required(NameField::LastName));
        }
        if let Some(err) = NameValidationError::from_issues(issues) {
            return Err(err);
        }

        Ok(Self {
            first_name: first.to_string(),
            last_name: last.to_string(),
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }
}
