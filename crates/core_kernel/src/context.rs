//! Money context: rounding policy and exchange rates
//!
//! Rather than reading a process-wide rounding mode or rate table, every
//! operation that needs either takes a `MoneyContext`. Tenants or tests that
//! need isolation simply build their own context.

use std::fmt;
use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::exchange::ExchangeRateTable;
use crate::money::{parse_money_parts, Currency, Money, MoneyError};

/// Decimal rounding policy applied when normalising money
///
/// Mirrors the standard decimal rounding modes. The default is banker's
/// rounding (half to even).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Away from zero
    Up,
    /// Towards zero (truncate)
    Down,
    /// Towards positive infinity
    Ceiling,
    /// Towards negative infinity
    Floor,
    /// Nearest neighbour, ties away from zero
    HalfUp,
    /// Nearest neighbour, ties towards zero
    HalfDown,
    /// Nearest neighbour, ties to the even neighbour
    #[default]
    HalfEven,
}

impl RoundingMode {
    /// Returns the equivalent rust_decimal strategy
    pub fn strategy(&self) -> RoundingStrategy {
        match self {
            RoundingMode::Up => RoundingStrategy::AwayFromZero,
            RoundingMode::Down => RoundingStrategy::ToZero,
            RoundingMode::Ceiling => RoundingStrategy::ToPositiveInfinity,
            RoundingMode::Floor => RoundingStrategy::ToNegativeInfinity,
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfDown => RoundingStrategy::MidpointTowardZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundingMode::Up => "up",
            RoundingMode::Down => "down",
            RoundingMode::Ceiling => "ceiling",
            RoundingMode::Floor => "floor",
            RoundingMode::HalfUp => "half_up",
            RoundingMode::HalfDown => "half_down",
            RoundingMode::HalfEven => "half_even",
        };
        write!(f, "{}", name)
    }
}

/// Everything money arithmetic needs beyond its operands
///
/// Cloning is cheap: the rate table is shared behind an `Arc`, so a
/// context handed to many workers still observes administrative rate
/// updates made through any of its clones.
#[derive(Debug, Clone, Default)]
pub struct MoneyContext {
    rounding: RoundingMode,
    rates: Arc<ExchangeRateTable>,
}

impl MoneyContext {
    /// Creates a context over the given rate table with half-even rounding
    pub fn new(rates: Arc<ExchangeRateTable>) -> Self {
        Self {
            rounding: RoundingMode::default(),
            rates,
        }
    }

    /// Replaces the rounding policy
    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    pub fn rates(&self) -> &ExchangeRateTable {
        &self.rates
    }

    /// Returns a shared handle to the rate table
    pub fn rate_table(&self) -> Arc<ExchangeRateTable> {
        Arc::clone(&self.rates)
    }

    /// Constructs money rounded with this context's policy
    pub fn money(&self, amount: Decimal, currency: Currency) -> Money {
        Money::with_rounding(amount, currency, self.rounding)
    }

    /// Parses `"$10.005 USD"` and rounds it with this context's policy
    pub fn parse_money(&self, s: &str) -> Result<Money, MoneyError> {
        let (amount, currency) = parse_money_parts(s)?;
        Ok(self.money(amount, currency))
    }
}
