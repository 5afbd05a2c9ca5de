//! Cancellation diagnostics
//!
//! A [`CancellationTrace`] is captured at the moment a cell is cancelled and
//! travels inside every later [`FutureError::Cancelled`](crate::FutureError::Cancelled),
//! so a consumer that fails can see who cancelled and from where.

use chrono::{DateTime, Utc};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::thread::{self, ThreadId};

/// Context captured by the thread that cancelled a cell
///
/// The backtrace follows the standard `RUST_BACKTRACE` / `RUST_LIB_BACKTRACE`
/// switches, so it is empty unless backtraces are enabled for the process.
#[derive(Debug)]
pub struct CancellationTrace {
    cancelled_at: DateTime<Utc>,
    thread_id: ThreadId,
    thread_name: Option<String>,
    backtrace: Backtrace,
}

impl CancellationTrace {
    /// Capture the calling thread's context
    pub fn capture() -> Self {
        let current = thread::current();
        Self {
            cancelled_at: Utc::now(),
            thread_id: current.id(),
            thread_name: current.name().map(str::to_owned),
            backtrace: Backtrace::capture(),
        }
    }

    /// Wall-clock time of the cancel call
    pub fn cancelled_at(&self) -> DateTime<Utc> {
        self.cancelled_at
    }

    /// Id of the cancelling thread
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Name of the cancelling thread, if it had one
    pub fn thread_name(&self) -> Option<&str> {
        self.thread_name.as_deref()
    }

    /// Stack of the cancel call
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    /// Whether a backtrace was actually recorded
    pub fn has_backtrace(&self) -> bool {
        self.backtrace.status() == BacktraceStatus::Captured
    }
}

impl std::fmt::Display for CancellationTrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cancelled at {} by thread {} ({:?})",
            self.cancelled_at.to_rfc3339(),
            self.thread_name.as_deref().unwrap_or("<unnamed>"),
            self.thread_id
        )?;
        if self.has_backtrace() {
            write!(f, "\n{}", self.backtrace)?;
        }
        Ok(())
    }
}
