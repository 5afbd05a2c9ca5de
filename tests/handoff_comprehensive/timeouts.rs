//! Timed Retrieval Tests
//!
//! Tests for get_timeout:
//! - timeout bounds
//! - zero timeout
//! - completion before the deadline

use crate::*;
use handoff::FutureError;

/// get(timeout=100ms) on a never-resolved cell
#[test]
fn test_timeout_after_at_least_deadline() {
    let cell = fast_cell::<u8>();
    let timeout = Duration::from_millis(100);

    let start = Instant::now();
    let err = cell.get_timeout(timeout).unwrap_err();
    let elapsed = start.elapsed();

    assert!(matches!(err, FutureError::Timeout { waited, .. } if waited == timeout));
    assert!(elapsed >= timeout, "returned early after {:?}", elapsed);
    assert!(elapsed < timeout + PROMPT, "overslept: {:?}", elapsed);
}

/// Poll interval longer than the timeout must not stretch the wait
#[test]
fn test_timeout_shorter_than_poll_interval() {
    let config = CellConfig::new().with_poll_interval(Duration::from_secs(30));
    let cell: FutureCell<u8> = FutureCell::with_config(config);
    let timeout = Duration::from_millis(50);

    let start = Instant::now();
    assert!(cell.get_timeout(timeout).unwrap_err().is_timeout());
    assert!(start.elapsed() >= timeout);
    assert!(start.elapsed() < timeout + PROMPT);
}

/// A zero deadline still performs one check
#[test]
fn test_zero_timeout() {
    let cell = FutureCell::new();
    assert!(cell.get_timeout(Duration::ZERO).unwrap_err().is_timeout());

    cell.complete(4u8).unwrap();
    assert_eq!(cell.get_timeout(Duration::ZERO).unwrap(), 4);
}

/// Completion during a timed wait delivers the value
#[test]
fn test_complete_before_deadline() {
    let cell = fast_cell::<u32>();

    let producer = {
        let cell = Arc::clone(&cell);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            cell.complete(77).unwrap();
        })
    };

    assert_eq!(cell.get_timeout(SAFETY_TIMEOUT).unwrap(), 77);
    producer.join().unwrap();
}

/// Huge timeouts behave like an unbounded wait
#[test]
fn test_unrepresentable_timeout() {
    let cell = fast_cell::<u32>();
    cell.complete(1).unwrap();
    assert_eq!(cell.get_timeout(Duration::MAX).unwrap(), 1);
}
