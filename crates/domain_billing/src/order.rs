//! Purchase orders and their totals
//!
//! An order is made of lines, and each line is made of charges. Totals are
//! never stored: they are folded from the charges on demand, converting any
//! foreign-currency charge into the line's or order's currency with the
//! caller's [`MoneyContext`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, ChargeId, Currency, Money, MoneyContext, MoneyError, OrderId, OrderLineId};

/// Something with a monetary total
pub trait Totaled {
    /// Computes the total
    ///
    /// # Errors
    ///
    /// Returns `MissingRate` if a component is in a currency the context
    /// cannot convert, or `Overflow` if the sum exceeds decimal range.
    fn total(&self, ctx: &MoneyContext) -> Result<Money, MoneyError>;
}

/// A single amount billed on an order line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charge {
    pub id: ChargeId,
    pub amount: Money,
    pub description: Option<String>,
}

impl Charge {
    pub fn new(amount: Money) -> Self {
        Self {
            id: ChargeId::new(),
            amount,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Totaled for Charge {
    fn total(&self, _ctx: &MoneyContext) -> Result<Money, MoneyError> {
        Ok(self.amount)
    }
}

/// A line on a purchase order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderLine {
    pub id: OrderLineId,
    pub description: String,
    /// Currency the line is totalled in
    pub currency: Currency,
    pub charges: Vec<Charge>,
}

impl PurchaseOrderLine {
    pub fn new(description: impl Into<String>, currency: Currency) -> Self {
        Self {
            id: OrderLineId::new(),
            description: description.into(),
            currency,
            charges: Vec::new(),
        }
    }

    /// Adds a charge to the line
    pub fn add_charge(&mut self, charge: Charge) {
        self.charges.push(charge);
    }

    pub fn with_charge(mut self, charge: Charge) -> Self {
        self.add_charge(charge);
        self
    }
}

impl Totaled for PurchaseOrderLine {
    fn total(&self, ctx: &MoneyContext) -> Result<Money, MoneyError> {
        Money::sum(self.charges.iter().map(|charge| &charge.amount), self.currency, ctx)
    }
}

/// A customer's purchase order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: OrderId,
    /// Human-readable order number, assigned when the order is recorded
    pub number: Option<String>,
    pub account_id: AccountId,
    pub currency: Currency,
    pub lines: Vec<PurchaseOrderLine>,
    pub created_at: DateTime<Utc>,
}

impl PurchaseOrder {
    pub fn new(account_id: AccountId, currency: Currency) -> Self {
        Self {
            id: OrderId::new(),
            number: None,
            account_id,
            currency,
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    /// Adds a line to the order
    pub fn add_line(&mut self, line: PurchaseOrderLine) {
        self.lines.push(line);
    }

    pub fn with_line(mut self, line: PurchaseOrderLine) -> Self {
        self.add_line(line);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|line| line.charges.is_empty())
    }
}

impl Totaled for PurchaseOrder {
    fn total(&self, ctx: &MoneyContext) -> Result<Money, MoneyError> {
        self.lines.iter().try_fold(Money::zero(self.currency), |total, line| {
            let line_total = line.total(ctx)?;
            total.add(&line_total, ctx)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_order_totals_to_zero() {
        let order = PurchaseOrder::new(AccountId::new(), Currency::USD);
        let total = order.total(&MoneyContext::default()).unwrap();
        assert_eq!(total, Money::zero(Currency::USD));
        assert!(order.is_empty());
    }

    #[test]
    fn test_single_currency_total_needs_no_rates() {
        let line = PurchaseOrderLine::new("Hosting", Currency::USD)
            .with_charge(Charge::new(Money::new(dec!(10.00), Currency::USD)))
            .with_charge(Charge::new(Money::new(dec!(2.50), Currency::USD)).with_description("Backup"));
        let order = PurchaseOrder::new(AccountId::new(), Currency::USD).with_line(line);

        let total = order.total(&MoneyContext::default()).unwrap();
        assert_eq!(total, Money::new(dec!(12.50), Currency::USD));
    }

    #[test]
    fn test_foreign_charge_without_rate_fails() {
        let line = PurchaseOrderLine::new("Support", Currency::USD)
            .with_charge(Charge::new(Money::new(dec!(10.00), Currency::EUR)));

        let result = line.total(&MoneyContext::default());
        assert!(matches!(result, Err(MoneyError::MissingRate(_))));
    }
}
