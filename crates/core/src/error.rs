//! Error types for future cells
//!
//! [`FutureError`] covers every way a retrieval can fail. Producers that
//! complete an already resolved cell get a [`DoubleCompletion`] back, which
//! still owns the rejected value.

use crate::trace::CancellationTrace;
use crate::types::{CellState, FutureId};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by cell operations
#[derive(Debug, Clone, Error)]
pub enum FutureError {
    /// The cell was cancelled before a value arrived
    #[error("future {id} was cancelled ({trace})")]
    Cancelled {
        /// Cell identifier
        id: FutureId,
        /// Context captured by the cancelling thread
        trace: Arc<CancellationTrace>,
    },

    /// The timed retrieval elapsed while the cell was still pending
    #[error("future {id} still pending after {waited:?}")]
    Timeout {
        /// Cell identifier
        id: FutureId,
        /// Requested timeout
        waited: Duration,
    },

    /// The blocked waiter was woken by `interrupt()`
    #[error("wait on future {id} was interrupted")]
    Interrupted {
        /// Cell identifier
        id: FutureId,
    },

    /// `complete` was called on a cell that is no longer pending
    #[error("future {id} is already {state}; second value rejected")]
    DoubleCompletion {
        /// Cell identifier
        id: FutureId,
        /// State the cell was in
        state: CellState,
    },

    /// The value was already delivered to an earlier `get`
    #[error("value of future {id} was already consumed")]
    AlreadyConsumed {
        /// Cell identifier
        id: FutureId,
    },

    /// Another thread is already blocked retrieving this cell
    #[error("future {id} already has a waiting consumer")]
    WaiterBusy {
        /// Cell identifier
        id: FutureId,
    },
}

impl FutureError {
    /// Identifier of the cell the error is about
    pub fn id(&self) -> FutureId {
        match self {
            FutureError::Cancelled { id, .. }
            | FutureError::Timeout { id, .. }
            | FutureError::Interrupted { id }
            | FutureError::DoubleCompletion { id, .. }
            | FutureError::AlreadyConsumed { id }
            | FutureError::WaiterBusy { id } => *id,
        }
    }

    /// Check if this is a cancellation error
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FutureError::Cancelled { .. })
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, FutureError::Timeout { .. })
    }

    /// Check if this is an interruption
    pub fn is_interrupted(&self) -> bool {
        matches!(self, FutureError::Interrupted { .. })
    }

    /// Cancellation context, for `Cancelled` errors
    pub fn cancellation_trace(&self) -> Option<&CancellationTrace> {
        match self {
            FutureError::Cancelled { trace, .. } => Some(trace),
            _ => None,
        }
    }
}

/// A value rejected by `complete` because the cell was already resolved
///
/// The rejected value is handed back to the producer instead of being dropped.
#[derive(Error)]
#[error("future {id} is already {state}; second value rejected")]
pub struct DoubleCompletion<T> {
    id: FutureId,
    state: CellState,
    value: T,
}

impl<T> DoubleCompletion<T> {
    pub(crate) fn new(id: FutureId, state: CellState, value: T) -> Self {
        Self { id, state, value }
    }

    /// Identifier of the cell
    pub fn id(&self) -> FutureId {
        self.id
    }

    /// State the cell was in when the value was rejected
    pub fn state(&self) -> CellState {
        self.state
    }

    /// Borrow the rejected value
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Take back the rejected value
    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T> std::fmt::Debug for DoubleCompletion<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DoubleCompletion")
            .field("id", &self.id)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<T> From<DoubleCompletion<T>> for FutureError {
    fn from(e: DoubleCompletion<T>) -> Self {
        FutureError::DoubleCompletion {
            id: e.id,
            state: e.state,
        }
    }
}

/// Result type for cell retrievals
pub type Result<T> = std::result::Result<T, FutureError>;
