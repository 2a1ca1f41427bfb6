//! bunny.net provider error types

use bunnyflow_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BunnyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status; `body` is the raw response text
    #[error("{method} {path} failed with status {status}: {body}")]
    Api {
        method: String,
        path: String,
        status: u16,
        body: String,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, BunnyError>;

impl From<BunnyError> for CloudError {
    fn from(err: BunnyError) -> Self {
        match err {
            BunnyError::Http(e) if e.is_decode() => {
                CloudError::InvariantViolation(format!("unreadable response: {}", e))
            }
            BunnyError::Http(e) if e.is_builder() => CloudError::InvalidConfig(e.to_string()),
            BunnyError::Http(e) => CloudError::Transport(e.to_string()),
            BunnyError::Api {
                method,
                path,
                status,
                body,
            } => CloudError::RemoteCall {
                method,
                path,
                status,
                body,
            },
            BunnyError::Json(e) => CloudError::Json(e),
            BunnyError::Io(e) => CloudError::Io(e),
            BunnyError::InvalidConfig(msg) => CloudError::InvalidConfig(msg),
        }
    }
}
