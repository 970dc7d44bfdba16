//! Error types for taskman
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad launch arguments, invalid config)
//! - 3: Access denied (admin-gated operation requested by another identity)
//! - 4: Operation failed (I/O error, malformed backing artifact)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the taskman CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const ACCESS_DENIED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskman operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Username already exists: {0}")]
    DuplicateUser(String),

    #[error("Wrong password for user: {0}")]
    WrongPassword(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Task is marked as complete and can no longer be edited")]
    TaskCompleted,

    #[error("No task at position {0}")]
    TaskNotFound(usize),

    // Access denial (exit code 3)
    #[error("Only the admin can view statistics")]
    AdminOnly,

    // Operation failures (exit code 4)
    #[error("Malformed line {line} in {}: {reason}", .path.display())]
    MalformedLine {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::InvalidConfig(_)
            | Error::UnknownUser(_)
            | Error::DuplicateUser(_)
            | Error::WrongPassword(_)
            | Error::InvalidDate(_)
            | Error::TaskCompleted
            | Error::TaskNotFound(_) => exit_codes::USER_ERROR,

            // Access denial
            Error::AdminOnly => exit_codes::ACCESS_DENIED,

            // Operation failures
            Error::MalformedLine { .. } | Error::Io(_) | Error::TomlParse(_) => {
                exit_codes::OPERATION_FAILED
            }
        }
    }
}

/// Result type alias for taskman operations
pub type Result<T> = std::result::Result<T, Error>;
