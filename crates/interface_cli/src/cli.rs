//! Command-line arguments

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use core_kernel::{Currency, Timezone};
use domain_billing::{CycleStartDay, PeriodUnit};

/// Billing cycle and currency calculations
#[derive(Debug, Parser)]
#[command(name = "billing-ng", version, about)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON); `BILLING_*` variables override it
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the billing cycle containing a date
    Cycle(CycleArgs),
    /// Convert an amount using the configured exchange rates
    Convert(ConvertArgs),
}

#[derive(Debug, Clone, Args)]
pub struct CycleArgs {
    /// First billable date (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// Last billable date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Day of the month cycles begin on, or `last`
    #[arg(long, default_value = "1")]
    pub cycle_start_day: CycleStartDay,

    /// Period unit: day, week, month or year
    #[arg(long, default_value = "month")]
    pub unit: PeriodUnit,

    /// Number of units per cycle
    #[arg(long, default_value_t = 1)]
    pub count: u32,

    /// Reference date; defaults to today
    #[arg(long)]
    pub on: Option<NaiveDate>,

    /// Timezone used to work out today's date
    #[arg(long, default_value = "UTC")]
    pub timezone: Timezone,
}

#[derive(Debug, Clone, Args)]
pub struct ConvertArgs {
    /// Amount with currency code, e.g. "10.00 CAD"
    ///
    /// Kept as text so it is rounded with the configured policy.
    #[arg(allow_hyphen_values = true)]
    pub amount: String,

    /// Target currency code
    #[arg(long)]
    pub to: Currency,
}
