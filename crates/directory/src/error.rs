//! Error types for directory publication

use thiserror::Error;

/// Errors reported by a [`Directory`](crate::Directory) backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// The backend could not be reached
    #[error("directory unavailable: {0}")]
    Unavailable(String),

    /// A binding already exists under the key
    #[error("key already bound: {key}")]
    AlreadyBound {
        /// The contested key
        key: String,
    },

    /// Nothing is bound under the key
    #[error("key not bound: {key}")]
    NotBound {
        /// The missing key
        key: String,
    },
}

impl DirectoryError {
    /// Check if the backend was unreachable
    pub fn is_unavailable(&self) -> bool {
        matches!(self, DirectoryError::Unavailable(_))
    }
}

/// Errors raised by [`Publisher`](crate::Publisher) operations
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// Publishing a cell failed
    #[error("failed to register {key}: {source}")]
    Registration {
        /// Directory key of the cell
        key: String,
        /// Backend failure
        #[source]
        source: DirectoryError,
    },

    /// No cell could be resolved under the key
    #[error("no future published under {key}")]
    NotFound {
        /// Directory key that was looked up
        key: String,
        /// Backend failure, if the lookup did not simply miss
        #[source]
        source: Option<DirectoryError>,
    },

    /// The key holds a cell with a different value type
    #[error("{key} is not a future of {expected}")]
    TypeMismatch {
        /// Directory key that was looked up
        key: String,
        /// Requested value type
        expected: &'static str,
    },
}

impl RegistryError {
    /// Directory key the error is about
    pub fn key(&self) -> &str {
        match self {
            RegistryError::Registration { key, .. }
            | RegistryError::NotFound { key, .. }
            | RegistryError::TypeMismatch { key, .. } => key,
        }
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound { .. })
    }

    /// Check if the directory backend was unreachable
    pub fn is_unavailable(&self) -> bool {
        match self {
            RegistryError::Registration { source, .. } => source.is_unavailable(),
            RegistryError::NotFound { source, .. } => {
                source.as_ref().map_or(false, DirectoryError::is_unavailable)
            }
            RegistryError::TypeMismatch { .. } => false,
        }
    }
}

/// Result type for publisher operations
pub type Result<T> = std::result::Result<T, RegistryError>;
