use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid resource name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Failed to scan {path}: {message}")]
    Scan { path: PathBuf, message: String },
}

impl CoreError {
    /// True for errors caused by the caller's inputs rather than remote state.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidInput(_) | CoreError::DirectoryNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
