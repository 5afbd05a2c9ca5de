//! Directory Publication Tests
//!
//! Tests for the publisher:
//! - publish / resolve across threads
//! - automatic unpublish after get and cancel
//! - directory outages

use crate::*;
use handoff::{CellState, Error, FutureId, RegistryError};

/// Scenario: publish C1, resolve it elsewhere, complete with 42
#[test]
fn test_resolve_from_other_thread_sees_completion() {
    init_tracing();
    let (publisher, directory) = create_publisher();
    let c1 = publisher.create::<i32>().unwrap();
    let id = c1.id();

    let consumer = {
        let publisher = publisher.clone();
        thread::spawn(move || {
            let resolved = publisher.resolve::<i32>(&id).unwrap();
            resolved.get_timeout(SAFETY_TIMEOUT)
        })
    };

    wait_for_waiter(&c1.cell());
    c1.complete(42).unwrap();

    let start = Instant::now();
    assert_eq!(consumer.join().unwrap().unwrap(), 42);
    assert!(start.elapsed() < PROMPT);
    assert!(!directory.contains(c1.key()), "terminal get unpublishes");
}

/// Resolved handles observe cancellation of the original
#[test]
fn test_resolved_handle_sees_cancellation() {
    let (publisher, _directory) = create_publisher();
    let original = publisher.create::<String>().unwrap();
    let resolved = publisher.resolve::<String>(&original.id()).unwrap();

    assert!(original.cancel(false));
    assert!(resolved.is_cancelled());
    assert_eq!(resolved.state(), CellState::Cancelled);
    assert!(resolved.get().unwrap_err().is_cancelled());
}

/// Only the identifier has to travel between contexts
#[test]
fn test_resolve_by_serialized_identifier() {
    let (publisher, _directory) = create_publisher();
    let future = publisher.create::<u8>().unwrap();

    let wire = future.id().to_string();
    let id: FutureId = wire.parse().unwrap();

    let resolved = publisher.resolve::<u8>(&id).unwrap();
    future.complete(8).unwrap();
    assert_eq!(resolved.get().unwrap(), 8);
}

/// After get, resolve fails with NotFound
#[test]
fn test_get_unpublishes() {
    let (publisher, directory) = create_publisher();
    let future = publisher.create::<u8>().unwrap();
    assert!(directory.contains(future.key()));

    future.complete(1).unwrap();
    future.get().unwrap();

    assert!(!directory.contains(future.key()));
    let err = publisher.resolve::<u8>(&future.id()).unwrap_err();
    assert!(matches!(err, RegistryError::NotFound { source: None, .. }));
}

/// After a successful cancel, resolve fails with NotFound
#[test]
fn test_cancel_unpublishes() {
    let (publisher, directory) = create_publisher();
    let future = publisher.create::<u8>().unwrap();

    assert!(future.cancel(true));
    assert!(!directory.contains(future.key()));
    assert!(publisher.resolve::<u8>(&future.id()).unwrap_err().is_not_found());
}

/// A failed cancel leaves the binding alone
#[test]
fn test_failed_cancel_keeps_binding() {
    let (publisher, directory) = create_publisher();
    let future = publisher.create::<u8>().unwrap();
    future.complete(3).unwrap();

    assert!(!future.cancel(true));
    assert!(directory.contains(future.key()));
    assert_eq!(publisher.resolve::<u8>(&future.id()).unwrap().get().unwrap(), 3);
}

/// Timed-out gets unpublish too
#[test]
fn test_timeout_unpublishes() {
    let (publisher, directory) = create_publisher();
    let future = publisher.create::<u8>().unwrap();

    assert!(future.get_timeout(Duration::from_millis(5)).unwrap_err().is_timeout());
    assert!(!directory.contains(future.key()));
}

/// Cleanup failures never reach the caller
#[test]
fn test_unpublish_failure_is_suppressed() {
    let (publisher, directory) = create_publisher();
    let future = publisher.create::<u8>().unwrap();
    future.complete(5).unwrap();

    directory.set_available(false);
    assert_eq!(future.get().unwrap(), 5);
    assert!(!future.cancel(true));

    directory.set_available(true);
    // Binding outlived the outage; explicit unpublish cleans it up
    assert!(directory.contains(future.key()));
    publisher.unpublish(&future.id());
    assert!(directory.is_empty());
}

/// create surfaces an unreachable directory
#[test]
fn test_create_with_directory_offline() {
    let (publisher, directory) = create_publisher();
    directory.set_available(false);

    let err: Error = publisher.create::<u8>().unwrap_err().into();
    assert!(matches!(err, Error::Registration(_)));
    assert!(err.is_retryable());
    assert!(directory.is_empty());
}

/// resolve reports NotFound when the directory is down
#[test]
fn test_resolve_with_directory_offline() {
    let (publisher, directory) = create_publisher();
    let future = publisher.create::<u8>().unwrap();
    directory.set_available(false);

    let err = publisher.resolve::<u8>(&future.id()).unwrap_err();
    assert!(err.is_not_found());
    assert!(err.is_unavailable());
}

/// Publishing an existing cell, e.g. one owned by a computed future
#[test]
fn test_publish_existing_cell() {
    let (publisher, directory) = create_publisher();
    let cell = fast_cell::<u16>();

    let published = publisher.publish(Arc::clone(&cell)).unwrap();
    assert_eq!(published.id(), cell.id());
    assert_eq!(published.key(), publisher.key_for(&cell.id()));
    assert!(published.key().starts_with("test/"));

    cell.complete(16).unwrap();
    assert_eq!(publisher.resolve::<u16>(&cell.id()).unwrap().get().unwrap(), 16);
    assert!(directory.is_empty());
}

/// Interrupting a published waiter unpublishes like any other get return
#[test]
fn test_interrupted_get_unpublishes() {
    let (publisher, directory) = create_publisher();
    let future = publisher.create::<u8>().unwrap();

    let waiter = {
        let future = future.clone();
        thread::spawn(move || future.get())
    };
    wait_for_waiter(&future.cell());

    assert!(future.interrupt());
    assert!(waiter.join().unwrap().unwrap_err().is_interrupted());
    assert!(!directory.contains(future.key()));
    assert_eq!(future.state(), CellState::Pending);
}

/// Many cells published and consumed concurrently through one directory
#[test]
fn test_many_futures_in_parallel() {
    const NUM_FUTURES: usize = 32;
    let (publisher, directory) = create_publisher();

    let futures: Vec<_> = (0..NUM_FUTURES)
        .map(|_| publisher.create::<usize>().unwrap())
        .collect();
    assert_eq!(directory.len(), NUM_FUTURES);

    let consumers: Vec<_> = futures
        .iter()
        .map(|f| {
            let id = f.id();
            let publisher = publisher.clone();
            thread::spawn(move || {
                publisher
                    .resolve::<usize>(&id)
                    .unwrap()
                    .get_timeout(SAFETY_TIMEOUT)
                    .unwrap()
            })
        })
        .collect();

    for (i, f) in futures.iter().enumerate() {
        f.complete(i).unwrap();
    }
    for (i, c) in consumers.into_iter().enumerate() {
        assert_eq!(c.join().unwrap(), i);
    }
    assert!(directory.is_empty());
}
