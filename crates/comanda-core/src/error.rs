//! # Error Types
//!
//! Domain-specific error types for comanda-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  comanda-core errors (this file)                                       │
//! │  ├── CoreError        - Not-found and state-conflict rule violations    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  comanda-db errors (separate crate)                                    │
//! │  ├── DbError          - Storage failures                               │
//! │  └── ServiceError     - CoreError ∪ DbError for repository calls       │
//! │                                                                         │
//! │  frontdesk errors (in app)                                             │
//! │  └── AppError         - What the operator sees                         │
//! │                                                                         │
//! │  Every error classifies into one ErrorKind:                            │
//! │    Validation | NotFound | StateConflict | Persistence                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use crate::types::TableStatus;

// =============================================================================
// Error Kind
// =============================================================================

/// The four failure classes callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad input (non-positive quantity, missing field, ...).
    Validation,
    /// A referenced id does not exist.
    NotFound,
    /// The entity is not in a state that allows the operation.
    StateConflict,
    /// The storage layer failed; the operation was rolled back.
    Persistence,
}

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
///
/// Each variant carries the ids involved so the caller can render an
/// actionable message ("Table 3 is occupied") instead of "operation failed".
#[derive(Debug, Error)]
pub enum CoreError {
    /// Referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// A tab can only be opened on a free table.
    ///
    /// ## User Workflow
    /// ```text
    /// open_tab(staff=1, table=4)
    ///      │
    ///      ▼
    /// table 4 status = reserved
    ///      │
    ///      ▼
    /// TableNotFree { table_id: 4, status: Reserved }
    ///      │
    ///      ▼
    /// Front desk shows: "Table 4 is reserved"
    /// ```
    #[error("Table {table_id} is {status}, a tab can only be opened on a free table")]
    TableNotFree { table_id: i64, status: TableStatus },

    /// The tab was already closed; closed tabs are immutable.
    #[error("Tab {tab_id} is already closed")]
    TabClosed { tab_id: i64 },

    /// Closing a tab with no line items would produce a zero bill.
    #[error("Tab {tab_id} has no items and cannot be closed")]
    EmptyTab { tab_id: i64 },

    /// Occupancy is owned by the tab lifecycle and cannot be edited by hand.
    #[error("Table {table_id} cannot be set to {requested} by a manual edit")]
    ManualStatusChange {
        table_id: i64,
        requested: TableStatus,
    },

    /// The table has an open tab; close it before editing or deleting the table.
    #[error("Table {table_id} has open tab {tab_id}")]
    TableHasOpenTab { table_id: i64, tab_id: i64 },

    /// The stored ledger of a tab sums past the representable range.
    #[error("Amount overflow while billing tab {tab_id}")]
    AmountOverflow { tab_id: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error for the given entity and id.
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        CoreError::NotFound { entity, id }
    }

    /// Classifies this error into the caller-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::NotFound { .. } => ErrorKind::NotFound,
            CoreError::TableNotFree { .. }
            | CoreError::TabClosed { .. }
            | CoreError::EmptyTab { .. }
            | CoreError::ManualStatusChange { .. }
            | CoreError::TableHasOpenTab { .. }
            | CoreError::AmountOverflow { .. } => ErrorKind::StateConflict,
            CoreError::Validation(_) => ErrorKind::Validation,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any lookup or mutation happens.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., CPF with letters, malformed amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Accepting the value would push a bill past the largest amount.
    #[error("{field} would exceed the largest billable amount")]
    AmountTooLarge { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
