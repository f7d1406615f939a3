//! Recurring billing cycle definitions
//!
//! A [`BillingCycle`] describes when an account is billed: the date billing
//! begins, an optional end date, the day of the month each cycle starts on,
//! and the [`Period`] between cycles. All calculations are pure functions of
//! the definition and a reference date; "today" is always passed in, or
//! derived from an explicit [`Timezone`].
//!
//! # Example
//!
//! ```rust,ignore
//! let cycle = BillingCycle::new(start, CycleStartDay::new(15)?, Period::months(1)?);
//! let current = cycle.current_cycle(today)?;
//! println!("cycle {} runs {} to {}", current.cycle_number, current.start, current.end);
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use core_kernel::temporal::last_day_of_month;
use core_kernel::{BillingCycleId, DateRange, Timezone};

use crate::current_cycle::CurrentCycle;
use crate::error::BillingError;
use crate::period::Period;

/// Day of the month on which each billing cycle begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum CycleStartDay {
    /// A fixed day, 1 through 30
    ///
    /// The start date's month must have this day.
    Day(u32),
    /// The last day of whatever month the cycle starts in
    LastDayOfMonth,
}

impl CycleStartDay {
    /// Persisted value meaning "last day of the month"
    pub const LAST_DAY_OF_MONTH: u32 = 31;

    /// Creates a cycle-start day from its persisted value
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchedule` for anything outside `1..=31`
    pub fn new(day: u32) -> Result<Self, BillingError> {
        match day {
            1..=30 => Ok(CycleStartDay::Day(day)),
            Self::LAST_DAY_OF_MONTH => Ok(CycleStartDay::LastDayOfMonth),
            _ => Err(BillingError::invalid_schedule(format!(
                "cycle start day must be between 1 and {}, got {}",
                Self::LAST_DAY_OF_MONTH,
                day
            ))),
        }
    }

    pub fn as_persisted(&self) -> u32 {
        match self {
            CycleStartDay::Day(day) => *day,
            CycleStartDay::LastDayOfMonth => Self::LAST_DAY_OF_MONTH,
        }
    }

    /// Returns this day within the month containing `date`
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchedule` if that month has no such day
    fn in_month_of(&self, date: NaiveDate) -> Result<NaiveDate, BillingError> {
        match self {
            CycleStartDay::Day(day) => date.with_day(*day).ok_or_else(|| {
                BillingError::invalid_schedule(format!(
                    "cycle start day {} does not exist in {}",
                    day,
                    date.format("%Y-%m")
                ))
            }),
            CycleStartDay::LastDayOfMonth => Ok(last_day_of_month(date)),
        }
    }
}

impl TryFrom<u32> for CycleStartDay {
    type Error = BillingError;

    fn try_from(day: u32) -> Result<Self, Self::Error> {
        CycleStartDay::new(day)
    }
}

impl From<CycleStartDay> for u32 {
    fn from(day: CycleStartDay) -> u32 {
        day.as_persisted()
    }
}

impl FromStr for CycleStartDay {
    type Err = BillingError;

    /// Parses a day number, or `last` for the last day of the month
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("last") {
            return Ok(CycleStartDay::LastDayOfMonth);
        }
        let day = s
            .parse::<u32>()
            .map_err(|_| BillingError::invalid_schedule(format!("invalid cycle start day '{}'", s)))?;
        CycleStartDay::new(day)
    }
}

impl fmt::Display for CycleStartDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleStartDay::Day(day) => write!(f, "{}", day),
            CycleStartDay::LastDayOfMonth => f.write_str("last"),
        }
    }
}

/// A recurring billing schedule
///
/// # Invariants
///
/// - `end`, when set, is not before `start`
/// - the schedule is never changed in place; a new start or cycle-start day
///   is a new schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PersistedBillingCycle", into = "PersistedBillingCycle")]
pub struct BillingCycle {
    id: BillingCycleId,
    start: NaiveDate,
    end: Option<NaiveDate>,
    cycle_start_day: CycleStartDay,
    period: Period,
}

impl BillingCycle {
    /// Creates an open-ended billing schedule
    pub fn new(start: NaiveDate, cycle_start_day: CycleStartDay, period: Period) -> Self {
        Self {
            id: BillingCycleId::new(),
            start,
            end: None,
            cycle_start_day,
            period,
        }
    }

    /// Sets the date billing stops
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchedule` if `end` is before the start date
    pub fn ending(mut self, end: NaiveDate) -> Result<Self, BillingError> {
        DateRange::new(self.start, end)
            .map_err(|e| BillingError::invalid_schedule(format!("end date before start date: {}", e)))?;
        self.end = Some(end);
        Ok(self)
    }

    pub fn with_id(mut self, id: BillingCycleId) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> BillingCycleId {
        self.id
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn cycle_start_day(&self) -> CycleStartDay {
        self.cycle_start_day
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// The dates billing is in effect, both ends inclusive, for a schedule
    /// with an end date
    pub fn billing_range(&self) -> Option<DateRange> {
        self.end.map(|end| DateRange {
            start: self.start,
            end,
        })
    }

    /// Returns the first occurrence of the cycle-start day on or after the
    /// start date
    ///
    /// The cycle-start day is first placed in the start date's month. When
    /// that lands before the start date the schedule steps forward whole
    /// periods from it until it reaches the start date, so an 11 day period
    /// anchored on the 3rd with billing starting January 26th first bills on
    /// February 5th.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchedule` when the start date's month has no such
    /// cycle-start day, such as the 30th with billing starting in February
    pub fn start_instant(&self) -> Result<NaiveDate, BillingError> {
        let anchor = self.cycle_start_day.in_month_of(self.start)?;
        let mut candidate = anchor;
        let mut steps = 0u32;

        while candidate < self.start {
            steps += 1;
            candidate = self.period.duration_for(steps).add_to(anchor)?;
        }

        Ok(candidate)
    }

    /// Returns the date billing stops
    ///
    /// An open-ended schedule ends on the start instant moved to the largest
    /// representable year, so downstream date math never special-cases
    /// "forever".
    pub fn end_instant(&self) -> Result<NaiveDate, BillingError> {
        if let Some(end) = self.end {
            return Ok(end);
        }

        let start = self.start_instant()?;
        let year = NaiveDate::MAX.year();
        NaiveDate::from_ymd_opt(year, start.month(), start.day())
            .or_else(|| last_day_of_month_in(year, start.month()))
            .ok_or_else(|| BillingError::DateOutOfRange(format!("{} in year {}", start, year)))
    }

    /// Number of complete periods between the start instant and `reference`
    ///
    /// A reference on a cycle boundary belongs to the cycle starting there.
    /// References before the start instant are in cycle 0.
    pub fn cycle_number(&self, reference: NaiveDate) -> Result<u32, BillingError> {
        let start = self.start_instant()?;
        Ok(CurrentCycle::calculate_cycle_number(&self.period, start, reference))
    }

    /// Returns true if billing is in effect on `date`, inclusive of both the
    /// start and end dates
    pub fn is_active(&self, date: NaiveDate) -> bool {
        match self.billing_range() {
            Some(range) => range.contains(date),
            None => date >= self.start,
        }
    }

    /// Returns true if billing is in effect today in the given timezone
    pub fn is_active_today(&self, tz: &Timezone) -> bool {
        self.is_active(tz.today())
    }

    /// Returns the cycle containing `reference`
    pub fn current_cycle(&self, reference: NaiveDate) -> Result<CurrentCycle, BillingError> {
        let start = self.start_instant()?;
        let current = CurrentCycle::calculate(&self.period, start, reference)?;

        debug!(
            billing_cycle = %self.id,
            %reference,
            cycle_number = current.cycle_number,
            start = %current.start,
            end = %current.end,
            "Resolved current billing cycle"
        );

        Ok(current)
    }

    /// Returns the cycle containing today's date in the given timezone
    pub fn current_cycle_today(&self, tz: &Timezone) -> Result<CurrentCycle, BillingError> {
        self.current_cycle(tz.today())
    }
}

fn last_day_of_month_in(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).map(last_day_of_month)
}

/// Persisted shape of a billing cycle, validated on the way in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedBillingCycle {
    pub id: BillingCycleId,
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
    pub cycle_start_day: CycleStartDay,
    pub period: Period,
}

impl TryFrom<PersistedBillingCycle> for BillingCycle {
    type Error = BillingError;

    fn try_from(record: PersistedBillingCycle) -> Result<Self, Self::Error> {
        let cycle = BillingCycle::new(record.start, record.cycle_start_day, record.period)
            .with_id(record.id);
        match record.end {
            Some(end) => cycle.ending(end),
            None => Ok(cycle),
        }
    }
}

impl From<BillingCycle> for PersistedBillingCycle {
    fn from(cycle: BillingCycle) -> Self {
        PersistedBillingCycle {
            id: cycle.id,
            start: cycle.start,
            end: cycle.end,
            cycle_start_day: cycle.cycle_start_day,
            period: cycle.period,
        }
    }
}
