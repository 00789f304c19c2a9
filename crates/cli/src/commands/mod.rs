//! CLI command implementations.
//!
//! Each command renders its output as a string; `main` prints it.

pub mod password;
pub mod route;
pub mod status;

use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Reading stdin failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output could not be produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No password was given on stdin.
    #[error("empty password; pipe the password on stdin")]
    EmptyPassword,

    /// Hashing failed.
    #[error("password hashing failed: {0}")]
    Hash(#[from] sellah_dashboard::services::AuthError),
}
