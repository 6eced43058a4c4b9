//! Transport contract between the client driver and the names API.

use async_trait::async_trait;
use namebook_core::{NameRecord, NewName};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned status {status}")]
    Status { status: u16 },

    #[error("no anti-forgery token available")]
    MissingToken,
}

pub type ClientResult<T> = Result<T, ClientError>;

/// The two operations the client needs from the server.
#[async_trait]
pub trait NamesApi: Send + Sync {
    async fn list_names(&self) -> ClientResult<Vec<NameRecord>>;

    async fn create_name(&self, name: &NewName, csrf_token: &str) -> ClientResult<NameRecord>;
}
