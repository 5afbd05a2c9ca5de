//! FutureCell Basic Operations Tests
//!
//! Tests for fundamental cell operations:
//! - complete / get
//! - state queries
//! - single-consumer rules

use crate::*;
use handoff::{CellState, FutureError};
use proptest::prelude::*;

/// Test that a completed value is returned as-is
#[test]
fn test_complete_then_get() {
    init_tracing();
    let cell = FutureCell::new();
    cell.complete(vec![1, 2, 3]).unwrap();
    assert_eq!(cell.get().unwrap(), vec![1, 2, 3]);
}

/// Test that get after complete doesn't block
#[test]
fn test_get_after_complete_is_immediate() {
    let cell = FutureCell::new();
    cell.complete(42u64).unwrap();

    let start = Instant::now();
    assert_eq!(cell.get().unwrap(), 42);
    assert!(start.elapsed() < PROMPT);
}

/// Test state queries through the lifecycle
#[test]
fn test_state_progression() {
    let cell = FutureCell::new();
    assert_eq!(cell.state(), CellState::Pending);
    assert!(!cell.is_done());

    cell.complete('x').unwrap();
    assert_eq!(cell.state(), CellState::Completed);
    assert!(cell.is_done());
    assert!(!cell.is_cancelled());

    // Consumption doesn't revert the state
    cell.get().unwrap();
    assert_eq!(cell.state(), CellState::Completed);
    assert!(cell.is_done());
}

/// Test that a second complete is observable and keeps the first value
#[test]
fn test_double_completion_is_rejected() {
    let cell = FutureCell::new();
    cell.complete("first").unwrap();

    let rejected = cell.complete("second").unwrap_err();
    assert_eq!(rejected.state(), CellState::Completed);
    assert_eq!(rejected.into_value(), "second");
    assert_eq!(cell.get().unwrap(), "first");
}

/// Test the single-consumer rule after delivery
#[test]
fn test_second_get_reports_consumed() {
    let cell = FutureCell::new();
    cell.complete(1u8).unwrap();
    cell.get().unwrap();

    let err = cell.get().unwrap_err();
    assert!(matches!(err, FutureError::AlreadyConsumed { id } if id == cell.id()));

    let err = cell.get_timeout(Duration::ZERO).unwrap_err();
    assert!(matches!(err, FutureError::AlreadyConsumed { .. }));
}

/// Test the single-consumer rule while a waiter is blocked
#[test]
fn test_concurrent_second_waiter_fails_fast() {
    let cell = fast_cell::<u32>();

    let first = {
        let cell = Arc::clone(&cell);
        thread::spawn(move || cell.get())
    };
    wait_for_waiter(&cell);

    let start = Instant::now();
    let err = cell.get_timeout(SAFETY_TIMEOUT).unwrap_err();
    assert!(matches!(err, FutureError::WaiterBusy { .. }));
    assert!(start.elapsed() < PROMPT, "second waiter must not block");

    cell.complete(5).unwrap();
    assert_eq!(first.join().unwrap().unwrap(), 5);
}

/// Test that the waiter slot frees up after a wait ends
#[test]
fn test_waiter_released_after_timeout() {
    let cell = fast_cell::<u32>();
    assert!(cell.get_timeout(Duration::from_millis(5)).unwrap_err().is_timeout());
    assert!(cell.waiter().is_none());

    cell.complete(3).unwrap();
    assert_eq!(cell.get().unwrap(), 3);
}

proptest! {
    /// For all values, complete once then get returns that value
    #[test]
    fn prop_get_returns_completed_value(value in any::<i64>(), text in ".*") {
        let cell = FutureCell::new();
        cell.complete((value, text.clone())).unwrap();
        prop_assert_eq!(cell.get().unwrap(), (value, text));
    }

    /// Any number of extra completions are all rejected with their own value
    #[test]
    fn prop_only_first_completion_wins(values in proptest::collection::vec(any::<u16>(), 1..20)) {
        let cell = FutureCell::new();
        cell.complete(values[0]).unwrap();
        for v in &values[1..] {
            let rejected = cell.complete(*v).unwrap_err();
            prop_assert_eq!(rejected.into_value(), *v);
        }
        prop_assert_eq!(cell.get().unwrap(), values[0]);
    }
}
