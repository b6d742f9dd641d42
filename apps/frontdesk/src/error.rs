//! # Front Desk Error Type
//!
//! Unified error type for front desk commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Front Desk                         │
//! │                                                                         │
//! │  Command Function                                                      │
//! │  Result<Output, AppError>                                              │
//! │         │                                                               │
//! │         ├── ServiceError::Core ──────── kind() ───┐                    │
//! │         ├── ServiceError::Persistence ── kind() ──┼──► AppError        │
//! │         └── DbError (startup) ────────────────────┘     │              │
//! │                                                          ▼              │
//! │  main: "error: Table 3 is occupied, ..." on stderr, exit code 4        │
//! │        or {"code": "STATE_CONFLICT", ...} with --json                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use comanda_core::{CoreError, ErrorKind, ValidationError};
use comanda_db::{DbError, ServiceError};
use serde::Serialize;
use thiserror::Error;

/// Error returned from front desk commands.
///
/// ## Serialization
/// With `--json`, this is what a script receives on stderr:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Tab not found: 12"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Error)]
#[error("{message}")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes, one per failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad input (quantity 0, malformed price, ...)
    ValidationError,

    /// Referenced id does not exist
    NotFound,

    /// Entity is in the wrong state (table occupied, tab closed, ...)
    StateConflict,

    /// Storage failed; nothing was committed
    DatabaseError,

    /// Anything else (configuration, I/O)
    Internal,
}

impl ErrorCode {
    /// Process exit status for this class of failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorCode::Internal => 1,
            ErrorCode::ValidationError => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::StateConflict => 4,
            ErrorCode::DatabaseError => 5,
        }
    }
}

impl From<ErrorKind> for ErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Validation => ErrorCode::ValidationError,
            ErrorKind::NotFound => ErrorCode::NotFound,
            ErrorKind::StateConflict => ErrorCode::StateConflict,
            ErrorKind::Persistence => ErrorCode::DatabaseError,
        }
    }
}

impl AppError {
    /// Creates a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }

    /// Process exit status.
    pub fn exit_code(&self) -> u8 {
        self.code.exit_code()
    }
}

/// Converts repository errors, hiding storage details behind a generic
/// message (the detail goes to the log).
impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let code = ErrorCode::from(err.kind());
        match err {
            ServiceError::Persistence(db) if code == ErrorCode::DatabaseError => db.into(),
            other => AppError::new(code, other.to_string()),
        }
    }
}

/// Converts database errors raised outside a repository call (startup).
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::PoolExhausted => {
                AppError::new(ErrorCode::DatabaseError, "Database is busy, try again")
            }
            other => {
                tracing::error!("Database operation failed: {}", other);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        ServiceError::from(err).into()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::new(ErrorCode::ValidationError, err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::internal(format!("Failed to render output: {err}"))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::internal(err.to_string())
    }
}

/// Result type for front desk commands.
pub type AppResult<T> = Result<T, AppError>;
