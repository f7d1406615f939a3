//! Billing configuration
//!
//! Settings are read from an optional file and then from `BILLING_*`
//! environment variables, with nested keys separated by `__`:
//!
//! ```text
//! BILLING_LOG_LEVEL=debug
//! BILLING_ROUNDING_MODE=half_up
//! BILLING_SYSTEM_CURRENCY=USD
//! BILLING_RATES__CAD=1.04279
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use config::builder::DefaultState;
use rust_decimal::Decimal;
use serde::Deserialize;

use core_kernel::{CoreError, Currency, ExchangeRateTable, MoneyContext, Rate, RoundingMode};

/// Billing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// Log level
    pub log_level: String,
    /// Rounding applied to every monetary result
    pub rounding_mode: RoundingMode,
    /// Pivot currency for the rate table
    pub system_currency: Currency,
    /// Units of each currency per one unit of the system currency, as
    /// decimal strings to keep them exact
    pub rates: HashMap<String, String>,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            rounding_mode: RoundingMode::default(),
            system_currency: Currency::USD,
            rates: HashMap::new(),
        }
    }
}

impl BillingConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::build(Config::builder())
    }

    /// Loads configuration from a file, if given, overridden by environment
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let builder = match path {
            Some(path) => Config::builder().add_source(File::from(path)),
            None => Config::builder(),
        };
        Self::build(builder)
    }

    /// Parses configuration from TOML text, without consulting the environment
    pub fn from_toml(contents: &str) -> Result<Self, config::ConfigError> {
        Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, config::ConfigError> {
        builder
            .add_source(
                Environment::with_prefix("BILLING")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Parses the configured rates
    ///
    /// An entry for the system currency itself is ignored.
    pub fn parsed_rates(&self) -> Result<Vec<Rate>, CoreError> {
        let mut rates = Vec::with_capacity(self.rates.len());
        for (code, value) in &self.rates {
            let currency = Currency::from_str(code)?;
            if currency == self.system_currency {
                continue;
            }
            let value = Decimal::from_str(value.trim()).map_err(|e| {
                CoreError::configuration(format!("rate for {} is not a decimal '{}': {}", code, value, e))
            })?;
            rates.push(Rate::new(value, currency)?);
        }
        Ok(rates)
    }

    /// Builds a money context with a freshly loaded rate table
    pub fn money_context(&self) -> Result<MoneyContext, CoreError> {
        let table = ExchangeRateTable::with_rates(self.system_currency, self.parsed_rates()?)?;
        Ok(MoneyContext::new(Arc::new(table)).with_rounding(self.rounding_mode))
    }
}
