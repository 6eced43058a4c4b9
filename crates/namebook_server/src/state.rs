//! Shared application state handed to every handler.

use std::sync::{Arc, Mutex};

use namebook_core::{NameService, RepoResult, SqliteNameRepository};
use rusqlite::Connection;

use crate::csrf::CsrfTokens;
use crate::error::{ApiError, ApiResult};

/// One SQLite connection behind a mutex plus the anti-forgery session table.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    csrf: Arc<CsrfTokens>,
}

impl AppState {
    /// Wraps an already-migrated connection (see `namebook_core::db::open_db`).
    pub fn new(conn: Connection) -> Self {
        Self::with_csrf(conn, CsrfTokens::new())
    }

    /// Same as [`AppState::new`] with a caller-tuned session table.
    pub fn with_csrf(conn: Connection, csrf: CsrfTokens) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            csrf: Arc::new(csrf),
        }
    }

    pub fn csrf(&self) -> Arc<CsrfTokens> {
        self.csrf.clone()
    }

    /// Runs `f` against a name service on the blocking pool.
    ///
    /// Each call holds the connection lock for its whole duration, so a
    /// create is never interleaved with another statement.
    pub async fn with_service<T, F>(&self, f: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&NameService<SqliteNameRepository<'_>>) -> RepoResult<T> + Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let conn = db
                .lock()
                .map_err(|_| ApiError::Internal("database lock poisoned".to_string()))?;
            let service = NameService::new(SqliteNameRepository::new(&conn));
            f(&service).map_err(ApiError::from)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("blocking task failed: {err}")))?
    }
}
