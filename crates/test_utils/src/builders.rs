//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::NaiveDate;
use core_kernel::{AccountId, Currency, Money};
use domain_billing::{
    BillingCycle, Charge, CycleStartDay, Period, PeriodUnit, PurchaseOrder, PurchaseOrderLine,
};
use rust_decimal::Decimal;

use crate::fixtures::{IdFixtures, TemporalFixtures};

/// Builder for billing schedules
pub struct BillingCycleBuilder {
    start: NaiveDate,
    end: Option<NaiveDate>,
    cycle_start_day: CycleStartDay,
    unit: PeriodUnit,
    count: u32,
}

impl Default for BillingCycleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BillingCycleBuilder {
    /// Creates a new builder: monthly on the 1st from Jan 1, 2010
    pub fn new() -> Self {
        Self {
            start: TemporalFixtures::billing_start(),
            end: None,
            cycle_start_day: CycleStartDay::Day(1),
            unit: PeriodUnit::Month,
            count: 1,
        }
    }

    /// Sets the start date
    pub fn starting(mut self, start: NaiveDate) -> Self {
        self.start = start;
        self
    }

    /// Sets the end date
    pub fn ending(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    /// Sets the cycle-start day from its persisted value
    pub fn on_day(mut self, day: u32) -> Self {
        self.cycle_start_day = CycleStartDay::new(day).expect("valid cycle start day");
        self
    }

    pub fn on_last_day(mut self) -> Self {
        self.cycle_start_day = CycleStartDay::LastDayOfMonth;
        self
    }

    /// Sets the period
    pub fn every(mut self, count: u32, unit: PeriodUnit) -> Self {
        self.count = count;
        self.unit = unit;
        self
    }

    /// Builds the schedule
    pub fn build(self) -> BillingCycle {
        let period = Period::new(self.unit, self.count).expect("non-zero period count");
        let cycle = BillingCycle::new(self.start, self.cycle_start_day, period);
        match self.end {
            Some(end) => cycle.ending(end).expect("end date not before start"),
            None => cycle,
        }
    }
}

/// Builder for purchase orders
pub struct PurchaseOrderBuilder {
    account_id: AccountId,
    currency: Currency,
    number: Option<String>,
    lines: Vec<PurchaseOrderLine>,
}

impl Default for PurchaseOrderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PurchaseOrderBuilder {
    /// Creates a new empty USD order builder
    pub fn new() -> Self {
        Self {
            account_id: IdFixtures::account_id(),
            currency: Currency::USD,
            number: None,
            lines: Vec::new(),
        }
    }

    /// Sets the order currency
    pub fn in_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    /// Adds a line with one charge per amount, totalled in the order currency
    pub fn with_line(mut self, description: &str, amounts: &[(Decimal, Currency)]) -> Self {
        let line = amounts.iter().fold(
            PurchaseOrderLine::new(description, self.currency),
            |line, (amount, currency)| line.with_charge(Charge::new(Money::new(*amount, *currency))),
        );
        self.lines.push(line);
        self
    }

    /// Builds the order
    pub fn build(self) -> PurchaseOrder {
        let mut order = PurchaseOrder::new(self.account_id, self.currency);
        if let Some(number) = self.number {
            order = order.with_number(number);
        }
        self.lines.into_iter().fold(order, PurchaseOrder::with_line)
    }
}
