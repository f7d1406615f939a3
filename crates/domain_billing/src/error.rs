//! Billing domain errors

use core_kernel::MoneyError;
use thiserror::Error;

/// Errors that can occur in the billing domain
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BillingError {
    /// Malformed schedule: bad cycle-start day, zero period count, or an
    /// end date before the start date
    #[error("Invalid billing schedule: {0}")]
    InvalidSchedule(String),

    /// Calendar arithmetic left the representable date range
    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    /// Monetary calculation failed
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}

impl BillingError {
    pub fn invalid_schedule(message: impl Into<String>) -> Self {
        BillingError::InvalidSchedule(message.into())
    }
}
