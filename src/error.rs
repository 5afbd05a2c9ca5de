//! Unified error types for Handoff.
//!
//! This module provides a single error type that wraps the member crates'
//! errors and presents a consistent interface to users.

use handoff_core::{CellState, DoubleCompletion, FutureError, FutureId};
use handoff_directory::{DirectoryError, RegistryError};
use std::time::Duration;
use thiserror::Error;

/// All Handoff errors.
///
/// This is the canonical error type for code that mixes cell and directory
/// operations and wants to use `?` across both.
#[derive(Debug, Error)]
pub enum Error {
    /// Cell was cancelled before a value arrived
    #[error(transparent)]
    Cancelled(FutureError),

    /// Timed retrieval elapsed
    #[error("future {id} still pending after {waited:?}")]
    Timeout {
        /// Cell identifier
        id: FutureId,
        /// Requested timeout
        waited: Duration,
    },

    /// Blocked waiter was interrupted
    #[error("wait on future {0} was interrupted")]
    Interrupted(FutureId),

    /// Second completion of a resolved cell
    #[error("future {id} is already {state}; second value rejected")]
    DoubleCompletion {
        /// Cell identifier
        id: FutureId,
        /// State the cell was in
        state: CellState,
    },

    /// Single-consumer rule violated (value taken, or another waiter)
    #[error(transparent)]
    Consumer(FutureError),

    /// Publishing a cell failed
    #[error("registration error: {0}")]
    Registration(#[source] RegistryError),

    /// No cell published under the identifier
    #[error("not found: {0}")]
    NotFound(#[source] RegistryError),

    /// Directory backend failure outside a publisher call
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),
}

/// Result type for Handoff operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is retryable.
    ///
    /// Timeouts and unreachable directories may succeed on a later attempt.
    /// Nothing in Handoff retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Timeout { .. } => true,
            Error::Registration(e) | Error::NotFound(e) => e.is_unavailable(),
            Error::Directory(e) => e.is_unavailable(),
            _ => false,
        }
    }

    /// Check if this is a cancellation error.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled(_))
    }

    /// Check if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Identifier of the cell involved, when known.
    pub fn future_id(&self) -> Option<FutureId> {
        match self {
            Error::Cancelled(e) | Error::Consumer(e) => Some(e.id()),
            Error::Timeout { id, .. } | Error::DoubleCompletion { id, .. } => Some(*id),
            Error::Interrupted(id) => Some(*id),
            _ => None,
        }
    }
}

// Convert from cell errors
impl From<FutureError> for Error {
    fn from(e: FutureError) -> Self {
        match e {
            FutureError::Cancelled { .. } => Error::Cancelled(e),
            FutureError::Timeout { id, waited } => Error::Timeout { id, waited },
            FutureError::Interrupted { id } => Error::Interrupted(id),
            FutureError::DoubleCompletion { id, state } => Error::DoubleCompletion { id, state },
            FutureError::AlreadyConsumed { .. } | FutureError::WaiterBusy { .. } => {
                Error::Consumer(e)
            }
        }
    }
}

// The rejected value is dropped here; keep the DoubleCompletion if you need it
impl<T> From<DoubleCompletion<T>> for Error {
    fn from(e: DoubleCompletion<T>) -> Self {
        Error::DoubleCompletion {
            id: e.id(),
            state: e.state(),
        }
    }
}

// Convert from publisher errors
impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::Registration { .. } => Error::Registration(e),
            RegistryError::NotFound { .. } | RegistryError::TypeMismatch { .. } => {
                Error::NotFound(e)
            }
        }
    }
}
