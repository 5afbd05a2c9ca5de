//! Directory publication for Handoff future cells
//!
//! Makes a [`FutureCell`](handoff_core::FutureCell) discoverable by
//! identifier from another thread or component:
//! - [`Directory`]: the naming-service seam (bind / unbind / lookup)
//! - [`MemoryDirectory`]: in-process implementation and test double
//! - [`Publisher`]: publishes, resolves and unpublishes cells
//! - [`PublishedFuture`]: handle that unpublishes on terminal operations

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod memory;
pub mod publisher;
pub mod traits;

pub use error::{DirectoryError, RegistryError, Result};
pub use memory::MemoryDirectory;
pub use publisher::{PublishedFuture, Publisher, PublisherBuilder, DEFAULT_NAMESPACE};
pub use traits::{Binding, Directory};
