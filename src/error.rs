use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error body returned by the payments service (`detail` field).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

impl AppError {
    /// Build an error from a non-success API response, extracting the
    /// human-readable `detail` message when the body carries one.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.detail,
            Err(_) => body.to_string(),
        };
        if status == 404 {
            AppError::NotFound(message)
        } else {
            AppError::Api { status, message }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
