//! Money types with precise decimal arithmetic
//!
//! This module provides a type-safe representation of monetary values
//! using rust_decimal for precise calculations without floating-point errors.
//!
//! Every `Money` is normalised to its currency's canonical number of
//! fractional digits (2 for USD, 0 for JPY, 3 for KWD) when it is
//! constructed. Arithmetic re-normalises before returning, so callers never
//! see a figure carrying more precision than the currency allows. The one
//! exception is [`Money::from_persisted`], which reproduces a stored figure
//! at exactly the scale it was recorded with.

use rust_decimal::Decimal;
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

use crate::context::{MoneyContext, RoundingMode};

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    USD,
    EUR,
    GBP,
    JPY,
    CHF,
    INR,
    AUD,
    CAD,
    SGD,
    HKD,
    NZD,
    SEK,
    CNY,
    MXN,
    KRW,
    BHD,
    KWD,
}

impl Currency {
    /// Every supported currency, in declaration order
    pub const ALL: [Currency; 17] = [
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::JPY,
        Currency::CHF,
        Currency::INR,
        Currency::AUD,
        Currency::CAD,
        Currency::SGD,
        Currency::HKD,
        Currency::NZD,
        Currency::SEK,
        Currency::CNY,
        Currency::MXN,
        Currency::KRW,
        Currency::BHD,
        Currency::KWD,
    ];

    /// Returns the number of decimal places for this currency
    ///
    /// This is the ISO 4217 "minor unit" of the currency, which every
    /// constructed `Money` is rounded to.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY | Currency::KRW => 0,
            Currency::BHD | Currency::KWD => 3,
            _ => 2,
        }
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            Currency::CHF => "CHF",
            Currency::INR => "₹",
            Currency::AUD => "A$",
            Currency::CAD => "C$",
            Currency::SGD => "S$",
            Currency::HKD => "HK$",
            Currency::NZD => "NZ$",
            Currency::SEK => "kr",
            Currency::CNY => "¥",
            Currency::MXN => "MX$",
            Currency::KRW => "₩",
            Currency::BHD => "BD",
            Currency::KWD => "KD",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
            Currency::INR => "INR",
            Currency::AUD => "AUD",
            Currency::CAD => "CAD",
            Currency::SGD => "SGD",
            Currency::HKD => "HKD",
            Currency::NZD => "NZD",
            Currency::SEK => "SEK",
            Currency::CNY => "CNY",
            Currency::MXN => "MXN",
            Currency::KRW => "KRW",
            Currency::BHD => "BHD",
            Currency::KWD => "KWD",
        }
    }

    /// Symbol with any alphabetic qualifier removed ("C$" becomes "$")
    fn bare_symbol(&self) -> String {
        self.symbol()
            .chars()
            .filter(|c| !c.is_ascii_alphabetic())
            .collect()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    /// Parses a 3-letter ISO 4217 code, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Currency::ALL
            .iter()
            .copied()
            .find(|currency| currency.code() == code)
            .ok_or_else(|| MoneyError::UnknownCurrency(s.trim().to_string()))
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: cannot operate on {0} and {1}")]
    CurrencyMismatch(String, String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Overflow during calculation")]
    Overflow,

    #[error("No exchange rate for {0}")]
    MissingRate(String),

    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),

    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    #[error("Cannot parse monetary amount: {0}")]
    Parse(String),
}

/// A monetary amount with associated currency
///
/// Two values are equal only when the currency, the numeric amount *and*
/// the scale all match: `29.9 CAD` recorded at scale 1 is not the same
/// figure as `29.90 CAD`.
///
/// Serialized through [`PersistedMoney`], so a loaded value is rebuilt by
/// [`Money::from_persisted`] like any other stored figure.
#[derive(Debug, Clone, Copy)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value rounded with the default (half-even) policy
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self::with_rounding(amount, currency, RoundingMode::default())
    }

    /// Creates a new Money value rounded with the given policy
    ///
    /// This is the single normalisation point that all arithmetic relies
    /// on: the amount is rounded to, and padded out to, exactly
    /// `currency.decimal_places()` digits.
    pub fn with_rounding(amount: Decimal, currency: Currency, rounding: RoundingMode) -> Self {
        let dp = currency.decimal_places();
        let mut amount = amount.round_dp_with_strategy(dp, rounding.strategy());
        amount.rescale(dp);
        Self { amount, currency }
    }

    /// Creates Money from an integer amount in minor units (e.g., cents)
    pub fn from_minor(minor_units: i64, currency: Currency) -> Self {
        Self {
            amount: Decimal::new(minor_units, currency.decimal_places()),
            currency,
        }
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self::from_minor(0, currency)
    }

    /// Rebuilds money from its persisted columns
    ///
    /// The stored scale is kept as-is rather than re-derived from the
    /// currency, so historical figures recorded at non-canonical precision
    /// survive a round trip unchanged.
    ///
    /// # Arguments
    ///
    /// * `long_value` - Amount with the decimal point removed (2939 for 29.39)
    /// * `scale` - Number of decimal places in `long_value`
    /// * `currency_code` - ISO 4217 code
    pub fn from_persisted(long_value: i64, scale: u32, currency_code: &str) -> Result<Self, MoneyError> {
        let currency = currency_code.parse()?;
        let amount = Decimal::try_new(long_value, scale)
            .map_err(|e| MoneyError::InvalidAmount(e.to_string()))?;
        Ok(Self { amount, currency })
    }

    /// Parses an amount that may carry a leading currency symbol ("$29.95")
    pub fn parse_amount(amount: &str, currency: Currency) -> Result<Self, MoneyError> {
        let amount = parse_decimal(strip_symbol(amount.trim()))?;
        Ok(Self::new(amount, currency))
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn currency_code(&self) -> &'static str {
        self.currency.code()
    }

    /// Number of decimal places the amount is held at
    pub fn scale(&self) -> u32 {
        self.amount.scale()
    }

    /// Returns the amount as an integral value, loosely the "number of
    /// pennies" (`29.93 CAD` gives `2993`)
    pub fn long_value(&self) -> Result<i64, MoneyError> {
        i64::try_from(self.amount.mantissa()).map_err(|_| MoneyError::Overflow)
    }

    /// Returns the three-column persisted form of this value
    pub fn to_persisted(&self) -> Result<PersistedMoney, MoneyError> {
        Ok(PersistedMoney {
            long_value: self.long_value()?,
            scale: self.scale(),
            currency_code: self.currency_code().to_string(),
        })
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Returns the absolute value
    pub fn abs(&self) -> Self {
        Self {
            amount: self.amount.abs(),
            currency: self.currency,
        }
    }

    /// Returns the negative of a positive amount, or the positive of a
    /// negative amount
    pub fn negate(&self) -> Self {
        Self {
            amount: -self.amount,
            currency: self.currency,
        }
    }

    /// Checked addition that returns an error on currency mismatch
    ///
    /// Unlike [`Money::add`] this never consults an exchange rate table.
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let amount = self.amount.checked_add(other.amount).ok_or(MoneyError::Overflow)?;
        Ok(Self::new(amount, self.currency))
    }

    /// Checked subtraction that returns an error on currency mismatch
    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let amount = self.amount.checked_sub(other.amount).ok_or(MoneyError::Overflow)?;
        Ok(Self::new(amount, self.currency))
    }

    /// Adds the given amount, converting it to this currency first
    ///
    /// The result is always in `self`'s currency.
    pub fn add(&self, other: &Money, ctx: &MoneyContext) -> Result<Money, MoneyError> {
        let other = self.convert(other, ctx)?;
        let amount = self.amount.checked_add(other.amount).ok_or(MoneyError::Overflow)?;
        Ok(ctx.money(amount, self.currency))
    }

    /// Subtracts the given amount, converting it to this currency first
    pub fn subtract(&self, other: &Money, ctx: &MoneyContext) -> Result<Money, MoneyError> {
        let other = self.convert(other, ctx)?;
        let amount = self.amount.checked_sub(other.amount).ok_or(MoneyError::Overflow)?;
        Ok(ctx.money(amount, self.currency))
    }

    /// Multiplies by a scalar (e.g., a quantity or a percentage rate)
    pub fn multiply(&self, factor: Decimal, ctx: &MoneyContext) -> Result<Money, MoneyError> {
        let amount = self.amount.checked_mul(factor).ok_or(MoneyError::Overflow)?;
        Ok(ctx.money(amount, self.currency))
    }

    /// Divides by a scalar
    pub fn divide(&self, divisor: Decimal, ctx: &MoneyContext) -> Result<Money, MoneyError> {
        if divisor.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        let amount = self.amount.checked_div(divisor).ok_or(MoneyError::Overflow)?;
        Ok(ctx.money(amount, self.currency))
    }

    /// Multiplies by another money amount, treated as a dimensionless scalar
    /// once converted to this currency
    ///
    /// Multiplying two monetary amounts does not normally produce a monetary
    /// amount; this exists for compatibility with stored pricing rules.
    pub fn multiply_money(&self, other: &Money, ctx: &MoneyContext) -> Result<Money, MoneyError> {
        let factor = self.convert(other, ctx)?.amount;
        self.multiply(factor, ctx)
    }

    /// Divides by another money amount, treated as a dimensionless scalar
    /// once converted to this currency
    pub fn divide_money(&self, other: &Money, ctx: &MoneyContext) -> Result<Money, MoneyError> {
        let divisor = self.convert(other, ctx)?.amount;
        self.divide(divisor, ctx)
    }

    /// Converts the given money into this currency
    ///
    /// Same-currency input is returned untouched. Otherwise the amount is
    /// first divided into system-currency units and rounded, with the
    /// context's policy, to the larger of the source rate's scale and the
    /// amount's own scale. Taking the larger keeps a system-currency source
    /// (rate `1`, scale 0) from being truncated to whole units. The pivot is
    /// then multiplied out by the target rate and rounded to this currency's
    /// canonical digits. Both rates come from a single snapshot of the table.
    pub fn convert(&self, money: &Money, ctx: &MoneyContext) -> Result<Money, MoneyError> {
        if self.currency == money.currency {
            return Ok(*money);
        }

        let rates = ctx.rates().snapshot();
        rates.system_rate()?;
        let source = rates.rate_of(money.currency)?;
        let target = rates.rate_of(self.currency)?;

        let pivot_scale = source.value().scale().max(money.amount.scale());
        let pivot = money
            .amount
            .checked_div(source.value())
            .ok_or(MoneyError::Overflow)?
            .round_dp_with_strategy(pivot_scale, ctx.rounding().strategy());

        let converted = pivot.checked_mul(target.value()).ok_or(MoneyError::Overflow)?;
        Ok(ctx.money(converted, self.currency))
    }

    /// Sums amounts into `currency`, converting each as needed
    pub fn sum<'a, I>(items: I, currency: Currency, ctx: &MoneyContext) -> Result<Money, MoneyError>
    where
        I: IntoIterator<Item = &'a Money>,
    {
        items
            .into_iter()
            .try_fold(Money::zero(currency), |total, item| total.add(item, ctx))
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        Ok(())
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.currency == other.currency
            && self.amount.scale() == other.amount.scale()
            && self.amount == other.amount
    }
}

impl Eq for Money {}

impl Hash for Money {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.currency.hash(state);
        self.amount.scale().hash(state);
        self.amount.mantissa().hash(state);
    }
}

impl fmt::Display for Money {
    /// Formats as `$56.23 USD`, `£17.00 GBP` or `¥193 JPY`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {}",
            self.currency.bare_symbol(),
            self.amount,
            self.currency.code()
        )
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    /// Parses `"$5.95 USD"` or `"10.20 GBP"`, rounding half-even
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (amount, currency) = parse_money_parts(s)?;
        Ok(Self::new(amount, currency))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_persisted()
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let persisted = PersistedMoney::deserialize(deserializer)?;
        Money::try_from(persisted).map_err(de::Error::custom)
    }
}

/// Splits `"$5.95 USD"` into its unrounded amount and currency
pub(crate) fn parse_money_parts(s: &str) -> Result<(Decimal, Currency), MoneyError> {
    let mut parts = strip_symbol(s.trim()).split_whitespace();
    let (amount, code) = match (parts.next(), parts.next(), parts.next()) {
        (Some(amount), Some(code), None) => (amount, code),
        _ => {
            return Err(MoneyError::Parse(format!(
                "expected '<amount> <currency code>', got '{}'",
                s
            )))
        }
    };

    let currency = code
        .parse::<Currency>()
        .map_err(|_| MoneyError::Parse(format!("unknown currency code '{}' in '{}'", code, s)))?;
    Ok((parse_decimal(amount)?, currency))
}

/// Persisted representation of [`Money`]: integral value, scale and code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedMoney {
    pub long_value: i64,
    pub scale: u32,
    pub currency_code: String,
}

impl TryFrom<PersistedMoney> for Money {
    type Error = MoneyError;

    fn try_from(persisted: PersistedMoney) -> Result<Self, Self::Error> {
        Money::from_persisted(persisted.long_value, persisted.scale, &persisted.currency_code)
    }
}

/// Drops any leading currency symbol, keeping a sign or decimal point
fn strip_symbol(s: &str) -> &str {
    s.trim_start_matches(|c: char| !(c.is_ascii_digit() || c == '-' || c == '+' || c == '.'))
}

fn parse_decimal(s: &str) -> Result<Decimal, MoneyError> {
    Decimal::from_str(s).map_err(|e| MoneyError::Parse(format!("'{}': {}", s, e)))
}
