/// Structured error types for ambulance-core.
///
/// Two layers: `StoreError` is what a document store reports, and
/// `WaitingListError` is what request-level operations report to callers.
/// Binary crates may wrap these in `anyhow`, library consumers match on them.
use std::time::Duration;

use thiserror::Error;

use crate::models::ValidationError;

pub type StoreResult<T> = Result<T, StoreError>;
pub type WaitingListResult<T> = Result<T, WaitingListError>;

/// Boxed source for driver errors we do not want to leak into the public API.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors reported by a document store
#[derive(Error, Debug)]
pub enum StoreError {
    /// No document is stored under this key
    #[error("document '{id}' not found")]
    NotFound { id: String },

    /// A document with this key already exists
    #[error("document '{id}' already exists")]
    Conflict { id: String },

    /// The unit of work exceeded its deadline
    #[error("document store operation timed out after {}s", after.as_secs())]
    Timeout { after: Duration },

    /// The connection could not be established
    #[error("failed to connect to document store: {0}")]
    Connection(String),

    /// The store was reachable but the operation failed
    #[error("document store error: {0}")]
    Transport(#[source] BoxError),
}

impl StoreError {
    pub fn transport(err: impl Into<BoxError>) -> Self {
        Self::Transport(err.into())
    }
}

/// Machine-checkable classification of a `WaitingListError`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Timeout,
    Transport,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation_error",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Timeout => "timeout",
            Self::Transport => "transport_error",
            Self::Internal => "internal_error",
        }
    }
}

/// Errors reported by waiting list and ambulance operations
#[derive(Error, Debug)]
pub enum WaitingListError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    #[error("{resource} '{id}' already exists")]
    Conflict { resource: &'static str, id: String },

    #[error("operation timed out after {}s", after.as_secs())]
    Timeout { after: Duration },

    #[error("document store unavailable: {0}")]
    Transport(String),

    /// A post-condition did not hold; points at a logic bug
    #[error("internal error: {0}")]
    Internal(String),
}

impl WaitingListError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<StoreError> for WaitingListError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => Self::NotFound {
                resource: "document",
                id,
            },
            StoreError::Conflict { id } => Self::Conflict {
                resource: "document",
                id,
            },
            StoreError::Timeout { after } => Self::Timeout { after },
            StoreError::Connection(message) => Self::Transport(message),
            StoreError::Transport(source) => Self::Transport(source.to_string()),
        }
    }
}
