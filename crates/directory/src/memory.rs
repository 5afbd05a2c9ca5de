//! In-memory directory implementation
//!
//! DashMap-backed, sharded, safe to share between threads. Besides serving
//! single-process deployments it doubles as a test double: an outage can be
//! simulated with [`MemoryDirectory::set_available`].

use crate::error::DirectoryError;
use crate::traits::{Binding, Directory};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory naming directory
///
/// # Example
///
/// ```
/// use handoff_directory::{Directory, MemoryDirectory};
/// use std::sync::Arc;
///
/// let directory = MemoryDirectory::new();
/// directory.bind("jobs/1", Arc::new(7u32)).unwrap();
/// assert!(directory.contains("jobs/1"));
///
/// directory.set_available(false);
/// assert!(directory.lookup("jobs/1").is_err());
/// ```
pub struct MemoryDirectory {
    bindings: DashMap<String, Binding>,
    available: AtomicBool,
}

impl MemoryDirectory {
    /// Create an empty, reachable directory
    pub fn new() -> Self {
        Self {
            bindings: DashMap::new(),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the backend going away (`false`) or coming back (`true`)
    ///
    /// Bindings survive an outage.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }

    /// Check if the directory currently answers calls
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    /// Check if `key` is bound, regardless of availability
    pub fn contains(&self, key: &str) -> bool {
        self.bindings.contains_key(key)
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if nothing is bound
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn ensure_available(&self) -> Result<(), DirectoryError> {
        if self.is_available() {
            Ok(())
        } else {
            Err(DirectoryError::Unavailable(
                "memory directory is offline".to_string(),
            ))
        }
    }
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl Directory for MemoryDirectory {
    fn bind(&self, key: &str, value: Binding) -> Result<(), DirectoryError> {
        self.ensure_available()?;
        match self.bindings.entry(key.to_string()) {
            Entry::Occupied(_) => Err(DirectoryError::AlreadyBound {
                key: key.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    fn unbind(&self, key: &str) -> Result<(), DirectoryError> {
        self.ensure_available()?;
        self.bindings
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| DirectoryError::NotBound {
                key: key.to_string(),
            })
    }

    fn lookup(&self, key: &str) -> Result<Binding, DirectoryError> {
        self.ensure_available()?;
        self.bindings
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| DirectoryError::NotBound {
                key: key.to_string(),
            })
    }
}

impl std::fmt::Debug for MemoryDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDirectory")
            .field("bindings", &self.bindings.len())
            .field("available", &self.is_available())
            .finish()
    }
}
