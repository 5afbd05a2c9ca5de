//! Directory trait definitions.
//!
//! A Directory is the external naming service cells are published in. It
//! maps string keys to opaque bindings and may live in another process, so
//! every call can fail.

use crate::error::DirectoryError;
use std::any::Any;
use std::sync::Arc;

/// Opaque value stored under a directory key
pub type Binding = Arc<dyn Any + Send + Sync>;

/// Naming service used to publish and look up cells.
///
/// # Contract
///
/// - `bind` fails with `AlreadyBound` if the key is taken, never overwrites
/// - `unbind` fails with `NotBound` if the key is absent
/// - `lookup` fails with `NotBound` if the key is absent
/// - Any call may fail with `Unavailable`
///
/// Implementations must not call back into the cells they store.
pub trait Directory: Send + Sync {
    /// Bind `value` under `key`
    fn bind(&self, key: &str, value: Binding) -> Result<(), DirectoryError>;

    /// Remove the binding under `key`
    fn unbind(&self, key: &str) -> Result<(), DirectoryError>;

    /// Fetch the binding under `key`
    fn lookup(&self, key: &str) -> Result<Binding, DirectoryError>;
}
