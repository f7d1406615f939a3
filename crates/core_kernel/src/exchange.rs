//! Exchange rates against a single system currency
//!
//! A [`Rate`] of `1.04279 CAD` means one unit of the system currency buys
//! 1.04279 CAD. Cross rates are never stored; conversion between two
//! non-system currencies pivots through the system currency.
//!
//! The table is read on every conversion and written only by
//! administrative updates. Writers build a fresh [`RateSnapshot`] and swap
//! it in whole, so a reader sees either the old table or the new one,
//! never a mix of the two.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use crate::money::{Currency, MoneyError};

fn acquire_read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned: PoisonError<RwLockReadGuard<'_, T>>| {
        warn!("Rate table lock was poisoned on read, recovering inner value");
        poisoned.into_inner()
    })
}

fn acquire_write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned: PoisonError<RwLockWriteGuard<'_, T>>| {
        warn!("Rate table lock was poisoned on write, recovering inner value");
        poisoned.into_inner()
    })
}

/// Conversion rate of a currency against the system currency
///
/// Deserialization goes through [`Rate::new`], so a stored zero or negative
/// rate is rejected on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rate {
    value: Decimal,
    currency: Currency,
}

impl Rate {
    /// Creates a rate; the value must be strictly positive
    pub fn new(value: Decimal, currency: Currency) -> Result<Self, MoneyError> {
        if value <= Decimal::ZERO {
            return Err(MoneyError::InvalidRate(format!(
                "{} rate must be positive, got {}",
                currency, value
            )));
        }
        Ok(Self { value, currency })
    }

    /// The unit rate of a system currency
    pub fn system(currency: Currency) -> Self {
        Self {
            value: Decimal::ONE,
            currency,
        }
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }
}

impl<'de> Deserialize<'de> for Rate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Fields {
            value: Decimal,
            currency: Currency,
        }

        let fields = Fields::deserialize(deserializer)?;
        Rate::new(fields.value, fields.currency).map_err(de::Error::custom)
    }
}

/// An immutable view of the rate table at one point in time
#[derive(Debug, Clone, Default)]
pub struct RateSnapshot {
    system: Option<Rate>,
    rates: HashMap<Currency, Rate>,
}

impl RateSnapshot {
    /// Returns the designated system currency, if one is set
    pub fn system_currency(&self) -> Option<Currency> {
        self.system.as_ref().map(Rate::currency)
    }

    /// Returns the system rate, failing if none has been designated
    pub fn system_rate(&self) -> Result<&Rate, MoneyError> {
        self.system
            .as_ref()
            .ok_or_else(|| MoneyError::MissingRate("system currency".to_string()))
    }

    /// Looks up the rate for a currency
    ///
    /// The system currency always resolves to its unit rate.
    pub fn rate_of(&self, currency: Currency) -> Result<&Rate, MoneyError> {
        match &self.system {
            Some(system) if system.currency == currency => Ok(system),
            _ => self
                .rates
                .get(&currency)
                .ok_or_else(|| MoneyError::MissingRate(currency.to_string())),
        }
    }

    /// Currencies with a non-system rate
    pub fn currencies(&self) -> impl Iterator<Item = Currency> + '_ {
        self.rates.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len() + usize::from(self.system.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared exchange rate table
#[derive(Debug, Default)]
pub struct ExchangeRateTable {
    current: RwLock<Arc<RateSnapshot>>,
}

impl ExchangeRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from a system currency and its foreign rates
    pub fn with_rates(system: Currency, rates: impl IntoIterator<Item = Rate>) -> Result<Self, MoneyError> {
        let table = Self::new();
        table.replace_all(Rate::system(system), rates)?;
        Ok(table)
    }

    /// Returns the current snapshot
    ///
    /// Hold on to the returned snapshot for the duration of a calculation
    /// that needs more than one rate.
    pub fn snapshot(&self) -> Arc<RateSnapshot> {
        acquire_read_lock(&self.current).clone()
    }

    /// Designates the pivot currency, replacing any previous designation
    ///
    /// The rate value must be exactly one.
    pub fn set_system_rate(&self, rate: Rate) -> Result<(), MoneyError> {
        if rate.value != Decimal::ONE {
            return Err(MoneyError::InvalidRate(format!(
                "system rate for {} must be 1, got {}",
                rate.currency, rate.value
            )));
        }
        let currency = rate.currency;
        self.update(|snapshot| {
            snapshot.rates.remove(&rate.currency);
            snapshot.system = Some(rate);
            Ok(())
        })?;
        info!(currency = %currency, "System currency set");
        Ok(())
    }

    /// Inserts or replaces the rate for a non-system currency
    ///
    /// The system-currency check runs under the write lock, against the
    /// snapshot being replaced.
    pub fn add_rate(&self, rate: Rate) -> Result<(), MoneyError> {
        let (currency, value) = (rate.currency, rate.value);
        self.update(|snapshot| {
            if snapshot.system_currency() == Some(rate.currency) {
                return Err(MoneyError::InvalidRate(format!(
                    "{} is the system currency",
                    rate.currency
                )));
            }
            snapshot.rates.insert(rate.currency, rate);
            Ok(())
        })?;
        info!(currency = %currency, rate = %value, "Exchange rate updated");
        Ok(())
    }

    /// Removes a non-system rate, returning it if present
    pub fn remove_rate(&self, currency: Currency) -> Option<Rate> {
        let removed = self
            .update(|snapshot| Ok(snapshot.rates.remove(&currency)))
            .ok()
            .flatten();
        if removed.is_some() {
            info!(currency = %currency, "Exchange rate removed");
        }
        removed
    }

    /// Looks up a rate in the current snapshot
    pub fn rate_of(&self, currency: Currency) -> Result<Rate, MoneyError> {
        self.snapshot().rate_of(currency).cloned()
    }

    pub fn system_currency(&self) -> Option<Currency> {
        self.snapshot().system_currency()
    }

    /// Atomically installs a complete new table
    pub fn replace_all(&self, system: Rate, rates: impl IntoIterator<Item = Rate>) -> Result<(), MoneyError> {
        if system.value != Decimal::ONE {
            return Err(MoneyError::InvalidRate(format!(
                "system rate for {} must be 1, got {}",
                system.currency, system.value
            )));
        }

        let mut snapshot = RateSnapshot {
            system: None,
            rates: HashMap::new(),
        };
        for rate in rates {
            if rate.currency != system.currency {
                snapshot.rates.insert(rate.currency, rate);
            }
        }
        let currency = system.currency;
        snapshot.system = Some(system);
        let count = snapshot.rates.len();

        *acquire_write_lock(&self.current) = Arc::new(snapshot);
        info!(system = %currency, rates = count, "Exchange rate table replaced");
        Ok(())
    }

    /// Copy-on-write update: readers keep whatever snapshot they already hold
    ///
    /// Nothing is installed when `apply` fails.
    fn update<T>(
        &self,
        apply: impl FnOnce(&mut RateSnapshot) -> Result<T, MoneyError>,
    ) -> Result<T, MoneyError> {
        let mut current = acquire_write_lock(&self.current);
        let mut next = (**current).clone();
        let result = apply(&mut next)?;
        *current = Arc::new(next);
        Ok(result)
    }
}
