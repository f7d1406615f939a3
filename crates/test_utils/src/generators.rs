//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::{Days, NaiveDate};
use core_kernel::{Currency, Money, Rate};
use domain_billing::{BillingCycle, CycleStartDay, Period, PeriodUnit};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating any supported Currency
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    proptest::sample::select(Currency::ALL.to_vec())
}

/// Strategy for the currencies covered by the reference rates
pub fn reference_currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::USD),
        Just(Currency::CAD),
        Just(Currency::GBP),
        Just(Currency::JPY),
    ]
}

/// Strategy for generating valid amounts in minor units
pub fn amount_minor_strategy() -> impl Strategy<Value = i64> {
    -1_000_000_000i64..1_000_000_000i64
}

/// Strategy for generating valid Money values (can be negative)
pub fn money_strategy() -> impl Strategy<Value = Money> {
    (amount_minor_strategy(), currency_strategy())
        .prop_map(|(amount, currency)| Money::from_minor(amount, currency))
}

/// Strategy for Money the reference rates can convert
pub fn convertible_money_strategy() -> impl Strategy<Value = Money> {
    (amount_minor_strategy(), reference_currency_strategy())
        .prop_map(|(amount, currency)| Money::from_minor(amount, currency))
}

/// Strategy for arbitrary-precision decimals (scale 0 to 9)
pub fn decimal_strategy() -> impl Strategy<Value = Decimal> {
    (-1_000_000_000_000i64..1_000_000_000_000i64, 0u32..10u32)
        .prop_map(|(m, s)| Decimal::new(m, s))
}

/// Strategy for generating positive exchange rate values (0.0001 to 1000)
pub fn rate_value_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 4))
}

/// Strategy for generating exchange rates for a non-USD currency
pub fn rate_strategy() -> impl Strategy<Value = Rate> {
    (rate_value_strategy(), currency_strategy().prop_filter("non-system", |c| *c != Currency::USD))
        .prop_map(|(value, currency)| Rate::new(value, currency).expect("positive rate"))
}

/// Strategy for period units
pub fn period_unit_strategy() -> impl Strategy<Value = PeriodUnit> {
    prop_oneof![
        Just(PeriodUnit::Day),
        Just(PeriodUnit::Week),
        Just(PeriodUnit::Month),
        Just(PeriodUnit::Year),
    ]
}

/// Strategy for periods with a count of 1 to 12
pub fn period_strategy() -> impl Strategy<Value = Period> {
    (period_unit_strategy(), 1u32..=12u32)
        .prop_map(|(unit, count)| Period::new(unit, count).expect("non-zero count"))
}

/// Strategy for cycle-start days every month has, plus the last-day value
pub fn cycle_start_day_strategy() -> impl Strategy<Value = CycleStartDay> {
    prop_oneof![
        (1u32..=28).prop_map(CycleStartDay::Day),
        Just(CycleStartDay::LastDayOfMonth),
    ]
}

/// Strategy for dates between 2000 and roughly 2030
pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u64..11_000u64).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date") + Days::new(offset)
    })
}

/// Strategy for open-ended billing schedules
pub fn billing_cycle_strategy() -> impl Strategy<Value = BillingCycle> {
    (date_strategy(), cycle_start_day_strategy(), period_strategy())
        .prop_map(|(start, day, period)| BillingCycle::new(start, day, period))
}
