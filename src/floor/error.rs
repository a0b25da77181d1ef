//! Error types for floor operations

use thiserror::Error;
use uuid::Uuid;

use super::table::TableStatus;

/// Result type for floor operations
pub type FloorResult<T> = Result<T, FloorError>;

/// Coarse classification used by callers to pick a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or missing input, rejected before any mutation
    InvalidInput,
    /// Referenced table, waitlist entry or server does not exist
    NotFound,
    /// Status precondition violated
    Conflict,
}

impl ErrorKind {
    /// Short label for logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
        }
    }
}

/// Errors returned by the floor coordinator and its stores
///
/// Every rejection leaves the floor exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FloorError {
    /// Input failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown table id
    #[error("Table not found: {0}")]
    TableNotFound(u32),

    /// Unknown or already consumed waitlist entry
    #[error("Waitlist entry not found: {0}")]
    WaitNotFound(Uuid),

    /// Server is not on the roster
    #[error("Server not found: {0}")]
    ServerNotFound(String),

    /// Table is not in a status that allows the operation
    #[error("Cannot {operation} table {table_id} while it is {status}")]
    Conflict {
        table_id: u32,
        status: TableStatus,
        operation: &'static str,
    },

    /// Server name already on the roster
    #[error("Server already on roster: {0}")]
    DuplicateServer(String),

    /// Every section already has a server
    #[error("Maximum number of servers ({0}) reached")]
    RosterFull(usize),
}

impl FloorError {
    /// Create an invalid input error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::TableNotFound(_) | Self::WaitNotFound(_) | Self::ServerNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Conflict { .. } | Self::DuplicateServer(_) | Self::RosterFull(_) => {
                ErrorKind::Conflict
            }
        }
    }
}
