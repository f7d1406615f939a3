//! Billing NG - Command Line Binary
//!
//! # Usage
//!
//! ```bash
//! # Which monthly cycle, anchored on the 15th, contains 2010-07-04?
//! billing-ng cycle --start 2010-01-30 --cycle-start-day 15 --on 2010-07-04
//!
//! # Convert with rates from the environment
//! BILLING_RATES__CAD=1.04279 billing-ng convert "10.00 CAD" --to USD
//! ```
//!
//! # Environment Variables
//!
//! * `BILLING_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `BILLING_ROUNDING_MODE` - up, down, ceiling, floor, half_up, half_down, half_even (default: half_even)
//! * `BILLING_SYSTEM_CURRENCY` - Pivot currency for exchange rates (default: USD)
//! * `BILLING_RATES__<CODE>` - Units of `<CODE>` per unit of the system currency

use anyhow::Context;
use clap::Parser;

use interface_cli::{commands, init_tracing, BillingConfig, Cli, Command};

fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = BillingConfig::load(cli.config.as_deref()).context("loading configuration")?;
    init_tracing(&config.log_level);

    tracing::debug!(
        rounding = %config.rounding_mode,
        system_currency = %config.system_currency,
        rates = config.rates.len(),
        "Configuration loaded"
    );

    match cli.command {
        Command::Cycle(args) => {
            let report = commands::cycle(&args)?;
            println!("{}", report);
        }
        Command::Convert(args) => {
            let ctx = config.money_context().context("building exchange rate table")?;
            let converted = commands::convert(&args, &ctx)?;
            println!("{}", converted);
        }
    }

    Ok(())
}
