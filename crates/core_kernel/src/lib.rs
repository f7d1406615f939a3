//! Core Kernel - Foundational types for the billing system
//!
//! This crate provides the building blocks shared by every billing module:
//! - Money with exact, currency-aware decimal precision
//! - Exchange rates against a single system currency, with pivot conversion
//! - A `MoneyContext` carrying the rounding policy and rate table
//! - Calendar helpers and strongly-typed identifiers

pub mod money;
pub mod context;
pub mod exchange;
pub mod temporal;
pub mod identifiers;
pub mod error;

pub use money::{Money, Currency, MoneyError, PersistedMoney};
pub use context::{MoneyContext, RoundingMode};
pub use exchange::{ExchangeRateTable, Rate, RateSnapshot};
pub use temporal::{DateRange, Timezone, TemporalError};
pub use identifiers::{
    AccountId, BillingCycleId, OrderId, OrderLineId, ChargeId,
};
pub use error::CoreError;
