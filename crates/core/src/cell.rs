//! FutureCell primitive implementation
//!
//! A single-assignment slot completed at most once by a producer and
//! retrieved by a consumer, with cancellation.
//!
//! ## State Machine
//!
//! ```text
//! Pending --complete(v)--> Completed   (terminal)
//! Pending --cancel()-----> Cancelled   (terminal)
//! Completed --cancel()---> no-op, returns false
//! Cancelled --complete()-> DoubleCompletion (value handed back)
//! ```
//!
//! ## Consumers
//!
//! A cell has at most one consumer. The value is moved out by the first
//! successful `get`; later retrievals fail with `AlreadyConsumed`. While one
//! thread is blocked in `get`, a second caller fails fast with `WaiterBusy`
//! instead of queueing behind it.
//!
//! ## Wakeups
//!
//! All transitions happen under one mutex and waiters re-check the state
//! after every wake, so a `complete` racing a blocked `get` is never lost.
//! `complete`, `cancel(true)` and `interrupt` notify the waiter; everything
//! else is observed at the next poll (see [`CellConfig`]).

use crate::config::CellConfig;
use crate::error::{DoubleCompletion, FutureError, Result};
use crate::trace::CancellationTrace;
use crate::types::{CellState, FutureId};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Single-assignment future cell
///
/// Share it between producer and consumer with an `Arc`.
///
/// # Example
///
/// ```
/// use handoff_core::FutureCell;
/// use std::sync::Arc;
/// use std::thread;
///
/// let cell = Arc::new(FutureCell::new());
/// let producer = Arc::clone(&cell);
/// thread::spawn(move || producer.complete(42).unwrap());
///
/// assert_eq!(cell.get().unwrap(), 42);
/// ```
///
/// # Thread Safety
///
/// `is_done`, `is_cancelled` and `state` take a snapshot; another thread may
/// resolve the cell right after they return. Use the result of `complete`,
/// `cancel` or `get` when a decision depends on who won.
pub struct FutureCell<T> {
    id: FutureId,
    config: CellConfig,
    inner: Mutex<Inner<T>>,
    ready: Condvar,
}

struct Inner<T> {
    resolution: Resolution<T>,
    waiter: Option<Waiter<T>>,
}

enum Resolution<T> {
    Pending,
    /// `None` once the value has been taken by a consumer
    Completed(Option<T>),
    Cancelled(Arc<CancellationTrace>),
}

impl<T> Resolution<T> {
    fn state(&self) -> CellState {
        match self {
            Resolution::Pending => CellState::Pending,
            Resolution::Completed(_) => CellState::Completed,
            Resolution::Cancelled(_) => CellState::Cancelled,
        }
    }
}

struct Waiter<T> {
    thread: ThreadId,
    interrupted: bool,
    /// Outcome moved here by `reset` before the waiter could collect it
    handed_off: Option<Result<T>>,
}

impl<T> FutureCell<T> {
    /// Create a pending cell with a fresh identifier
    pub fn new() -> Self {
        Self::with_config(CellConfig::default())
    }

    /// Create a pending cell with custom wait tuning
    pub fn with_config(config: CellConfig) -> Self {
        Self {
            id: FutureId::new(),
            config,
            inner: Mutex::new(Inner {
                resolution: Resolution::Pending,
                waiter: None,
            }),
            ready: Condvar::new(),
        }
    }

    /// Identifier assigned at creation
    pub fn id(&self) -> FutureId {
        self.id
    }

    /// Wait tuning of this cell
    pub fn config(&self) -> &CellConfig {
        &self.config
    }

    /// Store the value and wake the waiter
    ///
    /// # Errors
    ///
    /// Returns [`DoubleCompletion`] carrying `value` back if the cell is
    /// already completed or cancelled.
    pub fn complete(&self, value: T) -> std::result::Result<(), DoubleCompletion<T>> {
        let mut inner = self.inner.lock();
        let state = inner.resolution.state();
        if state != CellState::Pending {
            drop(inner);
            warn!(id = %self.id, %state, "rejected completion of resolved future");
            return Err(DoubleCompletion::new(self.id, state, value));
        }

        inner.resolution = Resolution::Completed(Some(value));
        let waiting = inner.waiter.is_some();
        drop(inner);

        self.ready.notify_one();
        debug!(id = %self.id, waiting, "future completed");
        Ok(())
    }

    /// Block until the cell is resolved
    ///
    /// # Errors
    ///
    /// - `Cancelled` if the cell was or becomes cancelled
    /// - `Interrupted` if [`interrupt`](Self::interrupt) woke this waiter
    /// - `AlreadyConsumed` if an earlier `get` took the value
    /// - `WaiterBusy` if another thread is already blocked here
    pub fn get(&self) -> Result<T> {
        self.wait(None)
    }

    /// Block until the cell is resolved or `timeout` elapses
    ///
    /// A zero timeout performs one non-blocking check.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get), plus `Timeout` if the cell is still
    /// pending at the deadline.
    pub fn get_timeout(&self, timeout: Duration) -> Result<T> {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.wait(Some((deadline, timeout))),
            // Too far away to represent; indistinguishable from no deadline
            None => self.wait(None),
        }
    }

    fn wait(&self, deadline: Option<(Instant, Duration)>) -> Result<T> {
        let mut inner = self.inner.lock();

        if let Some(outcome) = self.take_resolved(&mut inner) {
            return outcome;
        }
        if inner.waiter.is_some() {
            return Err(FutureError::WaiterBusy { id: self.id });
        }
        if let Some((at, waited)) = deadline {
            if Instant::now() >= at {
                return Err(FutureError::Timeout { id: self.id, waited });
            }
        }

        inner.waiter = Some(Waiter {
            thread: thread::current().id(),
            interrupted: false,
            handed_off: None,
        });

        let outcome = loop {
            let mut pause = self.config.poll_interval();
            if let Some((at, _)) = deadline {
                pause = pause.min(at.saturating_duration_since(Instant::now()));
            }
            self.ready.wait_for(&mut inner, pause);

            if let Some(outcome) = inner.waiter.as_mut().and_then(|w| w.handed_off.take()) {
                break outcome;
            }
            if let Some(outcome) = self.take_resolved(&mut inner) {
                break outcome;
            }
            if inner.waiter.as_ref().map_or(false, |w| w.interrupted) {
                break Err(FutureError::Interrupted { id: self.id });
            }
            if let Some((at, waited)) = deadline {
                if Instant::now() >= at {
                    break Err(FutureError::Timeout { id: self.id, waited });
                }
            }
        };

        inner.waiter = None;
        drop(inner);

        if let Err(e) = &outcome {
            debug!(id = %self.id, error = %e, "wait ended without value");
        }
        outcome
    }

    /// Outcome for a resolved cell, `None` while pending
    fn take_resolved(&self, inner: &mut Inner<T>) -> Option<Result<T>> {
        match &mut inner.resolution {
            Resolution::Pending => None,
            Resolution::Completed(slot) => Some(
                slot.take()
                    .ok_or(FutureError::AlreadyConsumed { id: self.id }),
            ),
            Resolution::Cancelled(trace) => Some(Err(FutureError::Cancelled {
                id: self.id,
                trace: Arc::clone(trace),
            })),
        }
    }

    /// Cancel a pending cell
    ///
    /// Returns `false` if the cell was already completed or cancelled.
    /// With `interrupt` set, a blocked waiter is woken right away; otherwise
    /// it notices the cancellation at its next poll.
    pub fn cancel(&self, interrupt: bool) -> bool {
        if self.is_done() {
            return false;
        }
        // Captured outside the lock; backtraces can be slow
        let trace = Arc::new(CancellationTrace::capture());

        let mut inner = self.inner.lock();
        if inner.resolution.state() != CellState::Pending {
            return false;
        }
        inner.resolution = Resolution::Cancelled(trace);
        let wake = interrupt && inner.waiter.is_some();
        drop(inner);

        if wake {
            self.ready.notify_one();
        }
        debug!(id = %self.id, interrupt, woke_waiter = wake, "future cancelled");
        true
    }

    /// Wake the blocked waiter with `Interrupted`, leaving the state alone
    ///
    /// Returns `false` if nobody is waiting.
    pub fn interrupt(&self) -> bool {
        let mut inner = self.inner.lock();
        let Some(waiter) = inner.waiter.as_mut() else {
            return false;
        };
        waiter.interrupted = true;
        let thread = waiter.thread;
        drop(inner);

        self.ready.notify_one();
        debug!(id = %self.id, ?thread, "waiter interrupted");
        true
    }

    /// Current lifecycle state
    pub fn state(&self) -> CellState {
        self.inner.lock().resolution.state()
    }

    /// Check if the cell is completed or cancelled
    pub fn is_done(&self) -> bool {
        self.state().is_terminal()
    }

    /// Check if the cell was cancelled
    pub fn is_cancelled(&self) -> bool {
        self.state() == CellState::Cancelled
    }

    /// Context captured by `cancel`, if the cell was cancelled
    pub fn cancellation_trace(&self) -> Option<Arc<CancellationTrace>> {
        match &self.inner.lock().resolution {
            Resolution::Cancelled(trace) => Some(Arc::clone(trace)),
            _ => None,
        }
    }

    /// Thread currently blocked in `get`, if any
    pub fn waiter(&self) -> Option<ThreadId> {
        self.inner.lock().waiter.as_ref().map(|w| w.thread)
    }

    /// Return to `Pending` with an empty slot, keeping the identifier
    ///
    /// A waiter blocked since before the cell resolved still receives that
    /// value or cancellation; otherwise it keeps waiting for the next value.
    /// An unclaimed value with nobody waiting is dropped.
    pub(crate) fn reset(&self) {
        let mut inner = self.inner.lock();
        let previous = std::mem::replace(&mut inner.resolution, Resolution::Pending);

        let mut handed_off = false;
        if let Some(waiter) = inner.waiter.as_mut() {
            if waiter.handed_off.is_none() {
                waiter.handed_off = match previous {
                    Resolution::Completed(Some(value)) => Some(Ok(value)),
                    Resolution::Cancelled(trace) => {
                        Some(Err(FutureError::Cancelled { id: self.id, trace }))
                    }
                    Resolution::Completed(None) | Resolution::Pending => None,
                };
                handed_off = waiter.handed_off.is_some();
            }
        }
        drop(inner);

        if handed_off {
            self.ready.notify_one();
        }
        debug!(id = %self.id, handed_off, "future reset");
    }
}

impl<T> Default for FutureCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for FutureCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FutureCell")
            .field("id", &self.id)
            .field("state", &self.state())
            .finish()
    }
}
