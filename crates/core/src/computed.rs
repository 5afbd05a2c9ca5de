//! ComputedFuture: a future cell fed by a function
//!
//! Calling [`ComputedFuture::apply`] runs the stored function on the caller's
//! thread and completes the underlying cell with the result. The same value
//! is returned to the caller, so the type works as a plain callable while
//! another thread waits on [`ComputedFuture::cell`].

use crate::cell::FutureCell;
use crate::config::CellConfig;
use crate::error::{DoubleCompletion, Result};
use crate::types::FutureId;
use std::sync::Arc;
use std::time::Duration;

type Function<P, T> = Box<dyn Fn(P) -> T + Send + Sync>;

/// A future cell paired with a single-input function
pub struct ComputedFuture<P, T> {
    cell: Arc<FutureCell<T>>,
    function: Option<Function<P, T>>,
}

impl<P, T: Clone> ComputedFuture<P, T> {
    /// Create a computed future around `function`
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(P) -> T + Send + Sync + 'static,
    {
        Self::with_config(function, CellConfig::default())
    }

    /// Create a computed future with custom wait tuning
    pub fn with_config<F>(function: F, config: CellConfig) -> Self
    where
        F: Fn(P) -> T + Send + Sync + 'static,
    {
        Self {
            cell: Arc::new(FutureCell::with_config(config)),
            function: Some(Box::new(function)),
        }
    }

    /// Create a computed future without a function; `apply` does nothing
    pub fn empty() -> Self {
        Self::empty_with_config(CellConfig::default())
    }

    /// Create a function-less computed future with custom wait tuning
    pub fn empty_with_config(config: CellConfig) -> Self {
        Self {
            cell: Arc::new(FutureCell::with_config(config)),
            function: None,
        }
    }

    /// Run the function on `input` and complete the cell with the result
    ///
    /// Returns `Ok(None)` without touching the cell when no function was
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns [`DoubleCompletion`] with the computed value if the cell is
    /// already resolved; call [`reset`](Self::reset) between computations.
    pub fn apply(&self, input: P) -> std::result::Result<Option<T>, DoubleCompletion<T>> {
        let Some(function) = &self.function else {
            return Ok(None);
        };
        let value = function(input);
        self.cell.complete(value.clone())?;
        Ok(Some(value))
    }

    /// Return the cell to `Pending` for the next computation
    ///
    /// A consumer blocked on the cell since before the last `apply` still
    /// receives that result.
    ///
    /// The identifier is kept. A cell that was published and then
    /// unpublished by a terminal `get` or `cancel` stays unpublished.
    pub fn reset(&self) {
        self.cell.reset();
    }

    /// Whether a function was configured
    pub fn has_function(&self) -> bool {
        self.function.is_some()
    }
}

impl<P, T> ComputedFuture<P, T> {
    /// Shared handle on the underlying cell
    pub fn cell(&self) -> Arc<FutureCell<T>> {
        Arc::clone(&self.cell)
    }

    /// Identifier of the underlying cell
    pub fn id(&self) -> FutureId {
        self.cell.id()
    }

    /// See [`FutureCell::get`]
    pub fn get(&self) -> Result<T> {
        self.cell.get()
    }

    /// See [`FutureCell::get_timeout`]
    pub fn get_timeout(&self, timeout: Duration) -> Result<T> {
        self.cell.get_timeout(timeout)
    }

    /// See [`FutureCell::cancel`]
    pub fn cancel(&self, interrupt: bool) -> bool {
        self.cell.cancel(interrupt)
    }

    /// See [`FutureCell::is_done`]
    pub fn is_done(&self) -> bool {
        self.cell.is_done()
    }

    /// See [`FutureCell::is_cancelled`]
    pub fn is_cancelled(&self) -> bool {
        self.cell.is_cancelled()
    }
}

impl<P, T> std::fmt::Debug for ComputedFuture<P, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputedFuture")
            .field("cell", &self.cell)
            .field("has_function", &self.function.is_some())
            .finish()
    }
}
