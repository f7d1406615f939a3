//! Billing Domain - Recurring Billing Cycles and Order Totals
//!
//! This crate answers the date questions every billing run asks: is this
//! schedule active, which cycle are we in, and where does that cycle start
//! and end. It also totals purchase orders across currencies.
//!
//! # Billing cycles
//!
//! A schedule is a start date, an optional end date, a cycle-start day of
//! the month (or the last day of the month), and a recurring [`Period`].
//! The first cycle begins on the first occurrence of the cycle-start day on
//! or after the start date; each later cycle begins one period after the
//! previous one, measured in calendar units so months of different lengths
//! are handled exactly.
//!
//! # Order totals
//!
//! [`PurchaseOrder`] and [`PurchaseOrderLine`] implement [`Totaled`], folding
//! their charges into a fresh [`core_kernel::Money`] on every call.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{BillingCycle, CycleStartDay, Period};
//!
//! let cycle = BillingCycle::new(start, CycleStartDay::LastDayOfMonth, Period::months(1)?);
//! let current = cycle.current_cycle(today)?;
//! ```

pub mod period;
pub mod cycle;
pub mod current_cycle;
pub mod order;
pub mod error;

pub use period::{CalendarDuration, Period, PeriodUnit, PersistedPeriod};
pub use cycle::{BillingCycle, CycleStartDay, PersistedBillingCycle};
pub use current_cycle::CurrentCycle;
pub use order::{Charge, PurchaseOrder, PurchaseOrderLine, Totaled};
pub use error::BillingError;
