//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common billing values. These
//! fixtures are designed to be consistent and predictable for unit tests.

use std::sync::Arc;

use chrono::NaiveDate;
use core_kernel::{AccountId, Currency, ExchangeRateTable, Money, MoneyContext, Rate, RoundingMode};
use domain_billing::{BillingCycle, CycleStartDay, Period};
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Creates a standard USD amount for testing
    pub fn usd_100() -> Money {
        Money::new(dec!(100.00), Currency::USD)
    }

    /// One US dollar, the system currency of the reference rates
    pub fn usd_1() -> Money {
        Money::new(dec!(1.00), Currency::USD)
    }

    pub fn cad_1() -> Money {
        Money::new(dec!(1.00), Currency::CAD)
    }

    pub fn gbp_1() -> Money {
        Money::new(dec!(1.00), Currency::GBP)
    }

    /// Creates a JPY amount (zero decimal places)
    pub fn jpy_100() -> Money {
        Money::new(dec!(100), Currency::JPY)
    }

    /// Creates a zero amount
    pub fn usd_zero() -> Money {
        Money::zero(Currency::USD)
    }

    /// Creates a EUR amount, which the reference rates cannot convert
    pub fn eur_100() -> Money {
        Money::new(dec!(100.00), Currency::EUR)
    }

    /// Creates a negative amount for credit scenarios
    pub fn usd_credit() -> Money {
        Money::new(dec!(-50.00), Currency::USD)
    }
}

/// Fixture for exchange rate test data
pub struct RateFixtures;

impl RateFixtures {
    /// Rates as of August 15, 2010 against USD
    pub fn reference_rates() -> Vec<Rate> {
        vec![
            Self::rate(dec!(1.04279), Currency::CAD),
            Self::rate(dec!(0.64218), Currency::GBP),
            Self::rate(dec!(85.8221), Currency::JPY),
        ]
    }

    /// Rate table with USD as the system currency and the reference rates
    pub fn reference_table() -> ExchangeRateTable {
        ExchangeRateTable::with_rates(Currency::USD, Self::reference_rates())
            .expect("reference rates are valid")
    }

    /// Context using the reference table and half-even rounding
    pub fn context() -> MoneyContext {
        MoneyContext::new(Arc::new(Self::reference_table()))
    }

    /// Context using the reference table and the given rounding mode
    pub fn context_with(rounding: RoundingMode) -> MoneyContext {
        Self::context().with_rounding(rounding)
    }

    /// Context whose table has rates but no system currency
    pub fn context_without_system_rate() -> MoneyContext {
        let table = ExchangeRateTable::new();
        for rate in Self::reference_rates() {
            table.add_rate(rate).expect("non-system rate");
        }
        MoneyContext::new(Arc::new(table))
    }

    fn rate(value: rust_decimal::Decimal, currency: Currency) -> Rate {
        Rate::new(value, currency).expect("positive rate")
    }
}

/// Fixture for calendar test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
    }

    /// Standard billing start date (Jan 1, 2010)
    pub fn billing_start() -> NaiveDate {
        Self::date(2010, 1, 1)
    }

    /// A start date late in the month (Jan 30, 2010)
    pub fn late_start() -> NaiveDate {
        Self::date(2010, 1, 30)
    }

    /// A date in a non-leap February
    pub fn february() -> NaiveDate {
        Self::date(2010, 2, 1)
    }

    /// A date in a leap-year February
    pub fn leap_february() -> NaiveDate {
        Self::date(2012, 2, 1)
    }
}

/// Fixture for billing schedules
pub struct ScheduleFixtures;

impl ScheduleFixtures {
    /// Monthly on the 1st from Jan 1, 2010
    pub fn monthly() -> BillingCycle {
        BillingCycle::new(
            TemporalFixtures::billing_start(),
            CycleStartDay::Day(1),
            Period::default(),
        )
    }

    /// Monthly on the last day of the month from Jan 1, 2010
    pub fn month_end() -> BillingCycle {
        BillingCycle::new(
            TemporalFixtures::billing_start(),
            CycleStartDay::LastDayOfMonth,
            Period::default(),
        )
    }

    /// Every five days from Jan 1, 2010
    pub fn every_five_days() -> BillingCycle {
        BillingCycle::new(
            TemporalFixtures::billing_start(),
            CycleStartDay::Day(1),
            Period::days(5).expect("non-zero count"),
        )
    }

    /// Weekly from Jan 1, 2010
    pub fn weekly() -> BillingCycle {
        BillingCycle::new(
            TemporalFixtures::billing_start(),
            CycleStartDay::Day(1),
            Period::weeks(1).expect("non-zero count"),
        )
    }

    /// Yearly from Jan 1, 2010
    pub fn yearly() -> BillingCycle {
        BillingCycle::new(
            TemporalFixtures::billing_start(),
            CycleStartDay::Day(1),
            Period::years(1).expect("non-zero count"),
        )
    }
}

/// Fixture for ID generation
pub struct IdFixtures;

impl IdFixtures {
    /// Creates a deterministic account ID for testing
    pub fn account_id() -> AccountId {
        AccountId::from_uuid(Uuid::from_u128(0x00000000_0000_0000_0000_000000000001))
    }
}
