//! Cloud provider error types

use bunnyflow_core::{AmbiguousMatch, CoreError};
use thiserror::Error;

/// Errors raised while provisioning or syncing
#[derive(Error, Debug)]
pub enum CloudError {
    /// The provider answered with a non-success status
    #[error("{method} {path} failed with status {status}: {body}")]
    RemoteCall {
        method: String,
        path: String,
        status: u16,
        body: String,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider's answer broke an assumption the deployment relies on
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Deployment cancelled")]
    Cancelled,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CloudError {
    /// Failures worth retrying: lost connections and throttling/gateway statuses
    pub fn is_transient(&self) -> bool {
        match self {
            CloudError::Transport(_) => true,
            CloudError::RemoteCall { status, .. } => matches!(status, 429 | 502 | 503 | 504),
            _ => false,
        }
    }

    pub fn is_input_error(&self) -> bool {
        matches!(self, CloudError::Core(e) if e.is_input_error())
    }
}

impl From<AmbiguousMatch> for CloudError {
    fn from(err: AmbiguousMatch) -> Self {
        CloudError::InvariantViolation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
