//! Command handlers
//!
//! Each handler takes parsed arguments and returns a printable report, so
//! the binary only wires configuration, logging and output together.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use core_kernel::{Money, MoneyContext};
use domain_billing::{BillingCycle, CurrentCycle, Period};

use crate::cli::{ConvertArgs, CycleArgs};
use crate::error::CliError;

/// Result of the `cycle` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub reference: NaiveDate,
    pub period: String,
    pub first_cycle_start: NaiveDate,
    pub schedule_end: NaiveDate,
    pub active: bool,
    pub current: CurrentCycle,
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reference date:    {}", self.reference)?;
        writeln!(f, "Period:            {}", self.period)?;
        writeln!(f, "First cycle start: {}", self.first_cycle_start)?;
        writeln!(f, "Schedule end:      {}", self.schedule_end)?;
        writeln!(f, "Active:            {}", if self.active { "yes" } else { "no" })?;
        writeln!(f, "Cycle number:      {}", self.current.cycle_number)?;
        writeln!(f, "Cycle start:       {}", self.current.start)?;
        write!(f, "Cycle end:         {} (exclusive)", self.current.end)
    }
}

/// Builds the schedule described by the arguments
pub fn schedule(args: &CycleArgs) -> Result<BillingCycle, CliError> {
    let period = Period::new(args.unit, args.count)?;
    let cycle = BillingCycle::new(args.start, args.cycle_start_day, period);
    Ok(match args.end {
        Some(end) => cycle.ending(end)?,
        None => cycle,
    })
}

/// Runs the `cycle` command
///
/// The reference date is `--on` when given, otherwise today in the
/// requested timezone.
pub fn cycle(args: &CycleArgs) -> Result<CycleReport, CliError> {
    let reference = args.on.unwrap_or_else(|| args.timezone.today());
    cycle_on(args, reference)
}

/// Runs the `cycle` command against an explicit reference date
pub fn cycle_on(args: &CycleArgs, reference: NaiveDate) -> Result<CycleReport, CliError> {
    let schedule = schedule(args)?;
    let current = schedule.current_cycle(reference)?;

    Ok(CycleReport {
        reference,
        period: schedule.period().to_string(),
        first_cycle_start: schedule.start_instant()?,
        schedule_end: schedule.end_instant()?,
        active: schedule.is_active(reference),
        current,
    })
}

/// Runs the `convert` command
///
/// The input amount is parsed with the context's rounding policy, as is the
/// converted result.
pub fn convert(args: &ConvertArgs, ctx: &MoneyContext) -> Result<Money, CliError> {
    let amount = ctx.parse_money(&args.amount)?;
    let converted = Money::zero(args.to).convert(&amount, ctx)?;
    info!(from = %amount, to = %converted, rounding = %ctx.rounding(), "Converted amount");
    Ok(converted)
}
