//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use chrono::NaiveDate;
use core_kernel::Money;
use domain_billing::CurrentCycle;
use rust_decimal::Decimal;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual,
        expected
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Asserts that a Money value is held at its currency's canonical scale
pub fn assert_canonical_scale(money: &Money) {
    assert_eq!(
        money.scale(),
        money.currency().decimal_places(),
        "Expected {} to have {} decimal places",
        money,
        money.currency().decimal_places()
    );
}

/// Asserts that a Money value is positive
pub fn assert_money_positive(money: &Money) {
    assert!(money.is_positive(), "Expected positive money, got {}", money);
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(money.is_zero(), "Expected zero money, got {}", money);
}

/// Asserts that a Money value is negative
pub fn assert_money_negative(money: &Money) {
    assert!(money.is_negative(), "Expected negative money, got {}", money);
}

/// Asserts that a cycle covers `date` under the half-open `[start, end)` rule
pub fn assert_cycle_contains(cycle: &CurrentCycle, date: NaiveDate) {
    assert!(
        cycle.contains(date),
        "Expected {} to contain {}",
        cycle,
        date
    );
}

/// Asserts a cycle's number and boundaries
pub fn assert_cycle_eq(cycle: &CurrentCycle, number: u32, start: NaiveDate, end: NaiveDate) {
    assert_eq!(
        (cycle.cycle_number, cycle.start, cycle.end),
        (number, start, end),
        "Unexpected cycle {}",
        cycle
    );
}
