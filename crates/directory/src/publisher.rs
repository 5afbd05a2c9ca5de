//! Publication of future cells in a naming directory
//!
//! A [`Publisher`] binds cells under `namespace + id` so another thread or
//! component can [`resolve`](Publisher::resolve) them by identifier. Handles
//! returned by the publisher ([`PublishedFuture`]) remove the binding on
//! their own once the cell is consumed, times out, or is cancelled.
//!
//! ## Lock Discipline
//!
//! Directory calls are made only after the cell operation has returned, so
//! the cell's internal lock is never held across a (possibly remote) call.
//!
//! ## Failure Policy
//!
//! `publish` and `resolve` surface directory failures. `unpublish` never
//! fails: cleanup is best effort and only logged.

use crate::error::{DirectoryError, RegistryError, Result};
use crate::memory::MemoryDirectory;
use crate::traits::{Binding, Directory};
use handoff_core::{CellConfig, CellState, DoubleCompletion, FutureCell, FutureId};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn, Dispatch};

/// Default key prefix for published cells
pub const DEFAULT_NAMESPACE: &str = "handoff/";

/// Publishes cells in a directory and resolves them by identifier
///
/// Cheap to clone; clones share the directory and settings.
///
/// # Example
///
/// ```
/// use handoff_directory::Publisher;
/// use std::thread;
///
/// let publisher = Publisher::builder().namespace("jobs/").build();
/// let future = publisher.create::<u64>().unwrap();
/// let id = future.id();
///
/// let remote = publisher.clone();
/// let consumer = thread::spawn(move || {
///     remote.resolve::<u64>(&id).unwrap().get().unwrap()
/// });
///
/// future.complete(42).unwrap();
/// assert_eq!(consumer.join().unwrap(), 42);
/// ```
#[derive(Clone)]
pub struct Publisher {
    directory: Arc<dyn Directory>,
    namespace: Arc<str>,
    cell_config: CellConfig,
    dispatch: Option<Dispatch>,
}

impl Publisher {
    /// Create a publisher over `directory` with default settings
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self::builder().directory(directory).build()
    }

    /// Create a builder for publisher configuration
    pub fn builder() -> PublisherBuilder {
        PublisherBuilder::new()
    }

    /// Directory this publisher binds into
    pub fn directory(&self) -> &Arc<dyn Directory> {
        &self.directory
    }

    /// Key prefix for published cells
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Config applied to cells created by [`create`](Self::create)
    pub fn cell_config(&self) -> CellConfig {
        self.cell_config
    }

    /// Directory key for a cell identifier
    pub fn key_for(&self, id: &FutureId) -> String {
        format!("{}{}", self.namespace, id)
    }

    /// Create a pending cell and publish it
    ///
    /// # Errors
    ///
    /// `RegistryError::Registration` if the directory rejects the binding.
    pub fn create<T: Send + 'static>(&self) -> Result<PublishedFuture<T>> {
        self.publish(Arc::new(FutureCell::with_config(self.cell_config)))
    }

    /// Publish an existing cell under its identifier
    ///
    /// # Errors
    ///
    /// `RegistryError::Registration` if the directory is unreachable or the
    /// key is already bound.
    pub fn publish<T: Send + 'static>(&self, cell: Arc<FutureCell<T>>) -> Result<PublishedFuture<T>> {
        let key = self.key_for(&cell.id());
        let binding: Binding = cell.clone();

        if let Err(source) = self.directory.bind(&key, binding) {
            self.log(|| warn!(%key, error = %source, "failed to publish future"));
            return Err(RegistryError::Registration { key, source });
        }
        self.log(|| debug!(%key, "future published"));

        Ok(PublishedFuture {
            cell,
            key,
            publisher: self.clone(),
        })
    }

    /// Remove the binding for `id`, logging instead of failing
    pub fn unpublish(&self, id: &FutureId) {
        self.unbind_key(&self.key_for(id));
    }

    /// Look up a previously published cell
    ///
    /// # Errors
    ///
    /// - `RegistryError::NotFound` if nothing is bound or the directory is
    ///   unreachable
    /// - `RegistryError::TypeMismatch` if the cell holds another value type
    pub fn resolve<T: Send + 'static>(&self, id: &FutureId) -> Result<PublishedFuture<T>> {
        let key = self.key_for(id);

        let binding = match self.directory.lookup(&key) {
            Ok(binding) => binding,
            Err(DirectoryError::NotBound { .. }) => {
                return Err(RegistryError::NotFound { key, source: None });
            }
            Err(source) => {
                self.log(|| warn!(%key, error = %source, "failed to resolve future"));
                return Err(RegistryError::NotFound {
                    key,
                    source: Some(source),
                });
            }
        };

        let cell = binding
            .downcast::<FutureCell<T>>()
            .map_err(|_| RegistryError::TypeMismatch {
                key: key.clone(),
                expected: std::any::type_name::<T>(),
            })?;

        Ok(PublishedFuture {
            cell,
            key,
            publisher: self.clone(),
        })
    }

    fn unbind_key(&self, key: &str) {
        match self.directory.unbind(key) {
            Ok(()) => self.log(|| debug!(%key, "future unpublished")),
            // The other handle on the same cell got there first
            Err(DirectoryError::NotBound { .. }) => {
                self.log(|| debug!(%key, "future already unpublished"))
            }
            Err(e) => self.log(|| warn!(%key, error = %e, "failed to unpublish future")),
        }
    }

    /// Run `f` with the injected subscriber, if any
    fn log<R>(&self, f: impl FnOnce() -> R) -> R {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, f),
            None => f(),
        }
    }
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("namespace", &self.namespace)
            .field("cell_config", &self.cell_config)
            .field("dispatch", &self.dispatch.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for publisher configuration.
///
/// # Example
///
/// ```
/// use handoff_core::CellConfig;
/// use handoff_directory::{MemoryDirectory, Publisher};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let publisher = Publisher::builder()
///     .directory(Arc::new(MemoryDirectory::new()))
///     .namespace("rpc/replies/")
///     .cell_config(CellConfig::new().with_poll_interval(Duration::from_millis(5)))
///     .build();
/// assert_eq!(publisher.namespace(), "rpc/replies/");
/// ```
pub struct PublisherBuilder {
    directory: Option<Arc<dyn Directory>>,
    namespace: String,
    cell_config: CellConfig,
    dispatch: Option<Dispatch>,
}

impl PublisherBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            directory: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            cell_config: CellConfig::default(),
            dispatch: None,
        }
    }

    /// Use `directory` as the naming service.
    ///
    /// Without one, `build` creates a private [`MemoryDirectory`].
    pub fn directory(mut self, directory: Arc<dyn Directory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Set the key prefix for published cells.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the config for cells created by the publisher.
    pub fn cell_config(mut self, config: CellConfig) -> Self {
        self.cell_config = config;
        self
    }

    /// Send the publisher's diagnostics to `dispatch` instead of the
    /// global subscriber.
    pub fn dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Build the publisher.
    pub fn build(self) -> Publisher {
        Publisher {
            directory: self
                .directory
                .unwrap_or_else(|| Arc::new(MemoryDirectory::new())),
            namespace: self.namespace.into(),
            cell_config: self.cell_config,
            dispatch: self.dispatch,
        }
    }
}

impl Default for PublisherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle on a published cell
///
/// Cell events raised through the handle go to the publisher's injected
/// subscriber, if it has one. Every `get`/`get_timeout` return, successful or not, and every successful
/// `cancel` removes the directory binding. Completing the cell does not: the
/// consumer still has to find it.
pub struct PublishedFuture<T> {
    cell: Arc<FutureCell<T>>,
    key: String,
    publisher: Publisher,
}

impl<T> PublishedFuture<T> {
    /// Identifier of the cell
    pub fn id(&self) -> FutureId {
        self.cell.id()
    }

    /// Directory key of the cell
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Shared handle on the underlying cell
    ///
    /// Operations on the bare cell do not touch the directory.
    pub fn cell(&self) -> Arc<FutureCell<T>> {
        Arc::clone(&self.cell)
    }

    /// See [`FutureCell::complete`]
    pub fn complete(&self, value: T) -> std::result::Result<(), DoubleCompletion<T>> {
        self.publisher.log(|| self.cell.complete(value))
    }

    /// See [`FutureCell::get`]; unpublishes afterwards
    pub fn get(&self) -> handoff_core::Result<T> {
        let outcome = self.publisher.log(|| self.cell.get());
        self.publisher.unbind_key(&self.key);
        outcome
    }

    /// See [`FutureCell::get_timeout`]; unpublishes afterwards
    pub fn get_timeout(&self, timeout: Duration) -> handoff_core::Result<T> {
        let outcome = self.publisher.log(|| self.cell.get_timeout(timeout));
        self.publisher.unbind_key(&self.key);
        outcome
    }

    /// See [`FutureCell::cancel`]; unpublishes if the cancel took effect
    pub fn cancel(&self, interrupt: bool) -> bool {
        let cancelled = self.publisher.log(|| self.cell.cancel(interrupt));
        if cancelled {
            self.publisher.unbind_key(&self.key);
        }
        cancelled
    }

    /// See [`FutureCell::interrupt`]
    pub fn interrupt(&self) -> bool {
        self.publisher.log(|| self.cell.interrupt())
    }

    /// See [`FutureCell::state`]
    pub fn state(&self) -> CellState {
        self.cell.state()
    }

    /// See [`FutureCell::is_done`]
    pub fn is_done(&self) -> bool {
        self.cell.is_done()
    }

    /// See [`FutureCell::is_cancelled`]
    pub fn is_cancelled(&self) -> bool {
        self.cell.is_cancelled()
    }
}

impl<T> Clone for PublishedFuture<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
            key: self.key.clone(),
            publisher: self.publisher.clone(),
        }
    }
}

impl<T> std::fmt::Debug for PublishedFuture<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishedFuture")
            .field("key", &self.key)
            .field("cell", &self.cell)
            .finish()
    }
}
