//! Core types for future cells
//!
//! This module defines the identity and state types shared by every cell:
//! - [`FutureId`]: Globally unique identifier of a cell
//! - [`CellState`]: Lifecycle state of a cell

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a future cell
///
/// FutureId is generated once when a cell is created and never changes.
/// It is the only part of a cell that ever crosses a process boundary:
/// - Directory keys are derived from it
/// - Serialized handles carry it instead of the live cell
/// - Diagnostics and log fields use its `Display` form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FutureId(Uuid);

impl FutureId {
    /// Create a new random FutureId using UUID v4
    ///
    /// # Examples
    ///
    /// ```
    /// use handoff_core::FutureId;
    ///
    /// let id1 = FutureId::new();
    /// let id2 = FutureId::new();
    /// assert_ne!(id1, id2);
    /// ```
    pub fn new() -> Self {
        FutureId(Uuid::new_v4())
    }

    /// Create FutureId from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        FutureId(Uuid::from_bytes(bytes))
    }

    /// Get raw bytes representation
    ///
    /// # Examples
    ///
    /// ```
    /// use handoff_core::FutureId;
    ///
    /// let id = FutureId::new();
    /// let id2 = FutureId::from_bytes(*id.as_bytes());
    /// assert_eq!(id, id2);
    /// ```
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for FutureId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FutureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FutureId {
    type Err = uuid::Error;

    /// Parse the hyphenated form produced by `Display`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(FutureId)
    }
}

/// Lifecycle state of a cell
///
/// ```text
/// Pending --complete(v)--> Completed   (terminal)
/// Pending --cancel()-----> Cancelled   (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    /// No value yet, not cancelled
    Pending,
    /// A value was stored
    Completed,
    /// Cancelled before a value arrived
    Cancelled,
}

impl CellState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CellState::Pending)
    }
}

impl std::fmt::Display for CellState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellState::Pending => write!(f, "pending"),
            CellState::Completed => write!(f, "completed"),
            CellState::Cancelled => write!(f, "cancelled"),
        }
    }
}
