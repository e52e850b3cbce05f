//! Application error types

use thiserror::Error;

/// Main application error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    // ===== Recoverable Errors (shown to the user, session continues) =====
    #[error("{0}")]
    Transport(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("No listing loaded")]
    NotSettled,

    #[error("File not in current listing: {0}")]
    FileNotInListing(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command} needs a {parameter}")]
    MissingParameter { command: String, parameter: String },

    // ===== Fatal Errors (path model misuse, broken setup) =====
    #[error("Invalid path segment: {0:?}")]
    InvalidSegment(String),

    #[error("Depth {depth} out of range for a path of length {len}")]
    IndexOutOfRange { depth: usize, len: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Initialization failed: {0}")]
    Init(String),
}

impl AppError {
    /// Is this error recoverable?
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Transport(_)
                | AppError::Timeout(_)
                | AppError::NotSettled
                | AppError::FileNotInListing(_)
                | AppError::UnknownCommand(_)
                | AppError::MissingParameter { .. }
        )
    }

    /// Is this a fatal error?
    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Get a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AppError::Timeout(ms) => format!("The server did not answer within {:.1} s", *ms as f64 / 1000.0),
            AppError::NotSettled => "Wait for the folder to finish loading".to_string(),
            AppError::FileNotInListing(id) => format!("File not found: {}", id),
            _ => self.to_string(),
        }
    }
}

impl From<app_fs::FsError> for AppError {
    fn from(e: app_fs::FsError) -> Self {
        match e {
            app_fs::FsError::InvalidSegment(s) => AppError::InvalidSegment(s),
            app_fs::FsError::IndexOutOfRange { depth, len } => AppError::IndexOutOfRange { depth, len },
            app_fs::FsError::InvalidUrl(msg) => AppError::Config(msg),
            app_fs::FsError::Transport(msg) => AppError::Transport(msg),
            other => AppError::Transport(other.to_string()),
        }
    }
}
