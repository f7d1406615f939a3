//! CLI error handling

use thiserror::Error;

use core_kernel::{CoreError, MoneyError};
use domain_billing::BillingError;

/// Errors surfaced by CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error(transparent)]
    Billing(#[from] BillingError),
}
