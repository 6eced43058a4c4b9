//! Name repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide append/list APIs over the canonical `names` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `create_name` is a single atomic `INSERT`.
//! - `list_names` returns rows in insertion order.

use crate::db::DbError;
use crate::model::name::{NameId, NameRecord, NewName};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const NAME_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    created_at,
    updated_at
FROM names";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for name persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted name data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for name records.
pub trait NameRepository {
    /// Appends one record stamped with `now` and returns it as stored.
    fn create_name(&self, name: &NewName, now: DateTime<Utc>) -> RepoResult<NameRecord>;
    fn get_name(&self, id: NameId) -> RepoResult<Option<NameRecord>>;
    fn list_names(&self) -> RepoResult<Vec<NameRecord>>;
}

/// SQLite-backed name repository.
pub struct SqliteNameRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNameRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NameRepository for SqliteNameRepository<'_> {
    fn create_name(&self, name: &NewName, now: DateTime<Utc>) -> RepoResult<NameRecord> {
        // Stored at millisecond precision, rounded up so the stamp never
        // precedes `now`. The returned record must match a re-read.
        let stamp_ms = ceil_to_millis(now);
        self.conn.execute(
            "INSERT INTO names (first_name, last_name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3);",
            params![name.first_name(), name.last_name(), stamp_ms],
        )?;
        let id: NameId = self.conn.last_insert_rowid();

        let stamp = epoch_ms_to_datetime(stamp_ms, "created_at")?;
        Ok(NameRecord {
            id,
            first_name: name.first_name().to_string(),
            last_name: name.last_name().to_string(),
            created_at: stamp,
            updated_at: stamp,
        })
    }

    fn get_name(&self, id: NameId) -> RepoResult<Option<NameRecord>> {
        let row = self
            .conn
            .query_row(
                &format!("{NAME_SELECT_SQL} WHERE id = ?1;"),
                [id],
                RawNameRow::from_row,
            )
            .optional()?;

        row.map(RawNameRow::into_record).transpose()
    }

    fn list_names(&self) -> RepoResult<Vec<NameRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NAME_SELECT_SQL} ORDER BY id ASC;"))?;
        let rows = stmt.query_map([], RawNameRow::from_row)?;

        let mut names = Vec::new();
        for row in rows {
            names.push(row?.into_record()?);
        }
        Ok(names)
    }
}

struct RawNameRow {
    id: NameId,
    first_name: String,
    last_name: String,
    created_at: i64,
    updated_at: i64,
}

impl RawNameRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn into_record(self) -> RepoResult<NameRecord> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(RepoError::InvalidData(format!(
                "blank name in names row id={}",
                self.id
            )));
        }

        Ok(NameRecord {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            created_at: epoch_ms_to_datetime(self.created_at, "created_at")?,
            updated_at: epoch_ms_to_datetime(self.updated_at, "updated_at")?,
        })
    }
}

fn ceil_to_millis(at: DateTime<Utc>) -> i64 {
    let millis = at.timestamp_millis();
    if at.timestamp_subsec_nanos() % 1_000_000 == 0 {
        millis
    } else {
        millis + 1
    }
}

fn epoch_ms_to_datetime(value: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(value).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "timestamp `{value}` out of range in names.{column}"
        ))
    })
}
