//! Error types for tanamao
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, unknown ids, missing data dir)
//! - 3: Blocked by policy (unauthorized actor, illegal status transition)
//! - 4: Operation failed (I/O, serialization, lock contention)

use std::path::PathBuf;
use thiserror::Error;

use crate::model::TaskStatus;

/// Exit codes for the tnm CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const POLICY_BLOCKED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for tanamao operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Data directory not initialized at {0}")]
    NotInitialized(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Store not found: {0}")]
    StoreNotFound(String),

    #[error("Region not found: {0}")]
    RegionNotFound(String),

    // Policy blocks (exit code 3)
    #[error("{actor} is not allowed to {action} task {task}")]
    Unauthorized {
        actor: String,
        action: String,
        task: String,
    },

    #[error("Task {task} is {actual}, cannot {action}")]
    InvalidTransition {
        task: String,
        actual: TaskStatus,
        action: String,
    },

    #[error("Task {0} is not delegable")]
    NotDelegable(String),

    #[error("Task {0} is not extendable")]
    NotExtendable(String),

    #[error("Completing task {0} requires a confirmation token")]
    ConfirmationRequired(String),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::NotInitialized(_)
            | Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::TaskNotFound(_)
            | Error::UserNotFound(_)
            | Error::StoreNotFound(_)
            | Error::RegionNotFound(_) => exit_codes::USER_ERROR,

            // Policy blocks
            Error::Unauthorized { .. }
            | Error::InvalidTransition { .. }
            | Error::NotDelegable(_)
            | Error::NotExtendable(_)
            | Error::ConfirmationRequired(_) => exit_codes::POLICY_BLOCKED,

            // Operation failures
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockFailed(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for tanamao operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_by_class() {
        assert_eq!(
            Error::TaskNotFound("t1".to_string()).exit_code(),
            exit_codes::USER_ERROR
        );
        assert_eq!(
            Error::Unauthorized {
                actor: "u3".to_string(),
                action: "start".to_string(),
                task: "t1".to_string(),
            }
            .exit_code(),
            exit_codes::POLICY_BLOCKED
        );
        assert_eq!(
            Error::InvalidTransition {
                task: "t1".to_string(),
                actual: TaskStatus::Concluida,
                action: "start".to_string(),
            }
            .exit_code(),
            exit_codes::POLICY_BLOCKED
        );
        assert_eq!(
            Error::LockFailed(PathBuf::from("x.lock")).exit_code(),
            exit_codes::OPERATION_FAILED
        );
    }

    #[test]
    fn json_error_carries_code() {
        let err = Error::ConfirmationRequired("t1".to_string());
        let json = JsonError::from(&err);
        assert_eq!(json.code, exit_codes::POLICY_BLOCKED);
        assert!(json.error.contains("confirmation token"));
    }
}
