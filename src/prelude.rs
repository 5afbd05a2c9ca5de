//! Convenient imports for Handoff.
//!
//! This module re-exports the most commonly used types so you can get started
//! with a single import:
//!
//! ```
//! use handoff::prelude::*;
//!
//! let cell = FutureCell::new();
//! cell.complete("ready")?;
//! assert_eq!(cell.get()?, "ready");
//! # Ok::<(), handoff::Error>(())
//! ```

// Error handling
pub use crate::error::{Error, Result};

// Cells
pub use handoff_core::{CellConfig, CellState, ComputedFuture, FutureCell, FutureId};

// Publication
pub use handoff_directory::{Directory, MemoryDirectory, PublishedFuture, Publisher};
