//! Cell configuration

use std::time::Duration;

/// Default interval between state re-checks of a blocked waiter
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Smallest accepted poll interval
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Tuning for blocked retrievals
///
/// A waiter is woken immediately by `complete`, `cancel(true)` and
/// `interrupt`. Anything else (notably `cancel(false)`) is only noticed the
/// next time the waiter re-checks the cell, at most `poll_interval` later.
///
/// # Example
///
/// ```
/// use handoff_core::CellConfig;
/// use std::time::Duration;
///
/// let config = CellConfig::default().with_poll_interval(Duration::from_millis(10));
/// assert_eq!(config.poll_interval(), Duration::from_millis(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellConfig {
    poll_interval: Duration,
}

impl CellConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the re-check interval, clamped to [`MIN_POLL_INTERVAL`]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// Interval between state re-checks
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl Default for CellConfig {
    fn default() -> Self {
        Self::new()
    }
}
