//! # Handoff
//!
//! Single-assignment futures that can be published under a unique
//! identifier and resolved from another thread or component.
//!
//! ## Quick Start
//!
//! ```
//! use handoff::prelude::*;
//! use std::thread;
//!
//! let publisher = Publisher::builder().build();
//!
//! // Producer side: create and publish a pending future
//! let future = publisher.create::<u32>()?;
//! let id = future.id();
//!
//! // Consumer side: only the identifier crosses over
//! let remote = publisher.clone();
//! let consumer = thread::spawn(move || -> handoff::Result<u32> {
//!     Ok(remote.resolve::<u32>(&id)?.get()?)
//! });
//!
//! future.complete(42)?;
//! assert_eq!(consumer.join().unwrap()?, 42);
//! # Ok::<(), handoff::Error>(())
//! ```
//!
//! ## Pieces
//!
//! - [`FutureCell`] - completed at most once, one consumer, cancellable
//! - [`ComputedFuture`] - a cell fed by a single-input function
//! - [`Publisher`] / [`PublishedFuture`] - directory publication with
//!   automatic cleanup after `get` or `cancel`
//! - [`Directory`] / [`MemoryDirectory`] - the naming-service seam
//!
//! ## Consumers
//!
//! Each cell hands its value to exactly one consumer. A second concurrent
//! `get` fails with `WaiterBusy`, a `get` after the value was taken fails
//! with `AlreadyConsumed`.

#![warn(missing_docs)]

mod error;

pub mod prelude;

pub use error::{Error, Result};

pub use handoff_core::{
    CancellationTrace, CellConfig, CellState, ComputedFuture, DoubleCompletion, FutureCell,
    FutureError, FutureId,
};
pub use handoff_directory::{
    Binding, Directory, DirectoryError, MemoryDirectory, PublishedFuture, Publisher,
    PublisherBuilder, RegistryError, DEFAULT_NAMESPACE,
};
