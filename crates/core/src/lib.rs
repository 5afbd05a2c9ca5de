//! Core future cells for Handoff
//!
//! This crate defines the single-assignment primitive everything else is
//! built on:
//! - [`FutureCell`]: completed at most once, retrieved by one consumer,
//!   cancellable while pending
//! - [`ComputedFuture`]: a cell fed by a single-input function
//! - [`FutureId`]: the identifier a cell is published under
//! - [`FutureError`] / [`DoubleCompletion`]: failure taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cell;
pub mod computed;
pub mod config;
pub mod error;
pub mod trace;
pub mod types;

pub use cell::FutureCell;
pub use computed::ComputedFuture;
pub use config::CellConfig;
pub use error::{DoubleCompletion, FutureError, Result};
pub use trace::CancellationTrace;
pub use types::{CellState, FutureId};
