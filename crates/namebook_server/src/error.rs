//! HTTP error contract for the names API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use namebook_core::{NameValidationError, RepoError};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Result type alias for handler operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Errors a handler can return.
#[derive(Error, Debug)]
pub enum ApiError {
    /// One or more fields failed boundary validation (422).
    #[error(transparent)]
    Validation(#[from] NameValidationError),

    /// Body was not a JSON object (422).
    #[error("The request body must be a JSON object: {0}")]
    MalformedBody(String),

    /// Storage failure (500).
    #[error("storage error: {0}")]
    Storage(#[from] RepoError),

    /// Worker or lock failure (500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MalformedBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        match self {
            Self::Validation(err) => {
                let mut errors = Map::new();
                for issue in err.issues() {
                    let messages = errors
                        .entry(issue.field.as_str())
                        .or_insert_with(|| Value::Array(Vec::new()));
                    if let Value::Array(list) = messages {
                        list.push(Value::String(issue.message()));
                    }
                }
                json!({ "message": err.to_string(), "errors": errors })
            }
            Self::MalformedBody(_) => json!({ "message": self.to_string(), "errors": {} }),
            // Storage details stay in the log.
            Self::Storage(_) | Self::Internal(_) => json!({ "message": "Server Error" }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("event=api_error module=api status=error error={self}");
        }
        (status, Json(self.body())).into_response()
    }
}
