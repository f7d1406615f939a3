//! Recurring billing periods
//!
//! A [`Period`] is a unit (day, week, month or year) repeated `count` times.
//! Cycle math never stores elapsed time as a fixed number of days: it asks
//! the period for a [`CalendarDuration`] covering some number of cycles and
//! applies that to a date, so "one month" after January 31st is the last
//! day of February rather than March 3rd.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::BillingError;

/// Unit of a billing period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodUnit {
    Day,
    Week,
    Month,
    Year,
}

impl PeriodUnit {
    /// Lower-case singular name ("day", "week", ...)
    pub fn name(&self) -> &'static str {
        match self {
            PeriodUnit::Day => "day",
            PeriodUnit::Week => "week",
            PeriodUnit::Month => "month",
            PeriodUnit::Year => "year",
        }
    }
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for PeriodUnit {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().trim_end_matches('s') {
            "day" => Ok(PeriodUnit::Day),
            "week" => Ok(PeriodUnit::Week),
            "month" => Ok(PeriodUnit::Month),
            "year" => Ok(PeriodUnit::Year),
            _ => Err(BillingError::invalid_schedule(format!("unknown period unit '{}'", s))),
        }
    }
}

/// A recurring interval: `count` repetitions of `unit`
///
/// # Invariants
///
/// - `count >= 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PersistedPeriod", into = "PersistedPeriod")]
pub struct Period {
    unit: PeriodUnit,
    count: u32,
}

impl Period {
    /// Creates a new period
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchedule` if `count` is zero
    pub fn new(unit: PeriodUnit, count: u32) -> Result<Self, BillingError> {
        if count == 0 {
            return Err(BillingError::invalid_schedule(format!(
                "period count must be at least 1, got 0 {}s",
                unit
            )));
        }
        Ok(Self { unit, count })
    }

    pub fn days(count: u32) -> Result<Self, BillingError> {
        Self::new(PeriodUnit::Day, count)
    }

    pub fn weeks(count: u32) -> Result<Self, BillingError> {
        Self::new(PeriodUnit::Week, count)
    }

    pub fn months(count: u32) -> Result<Self, BillingError> {
        Self::new(PeriodUnit::Month, count)
    }

    pub fn years(count: u32) -> Result<Self, BillingError> {
        Self::new(PeriodUnit::Year, count)
    }

    pub fn unit(&self) -> PeriodUnit {
        self.unit
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Returns the calendar duration of `cycles` consecutive periods
    ///
    /// `duration_for(1)` is the length of a single cycle and
    /// `duration_for(0)` is empty.
    pub fn duration_for(&self, cycles: u32) -> CalendarDuration {
        let amount = u64::from(self.count) * u64::from(cycles);
        match self.unit {
            PeriodUnit::Day => CalendarDuration::Days(amount),
            PeriodUnit::Week => CalendarDuration::Weeks(amount),
            PeriodUnit::Month => CalendarDuration::Months(amount),
            PeriodUnit::Year => CalendarDuration::Years(amount),
        }
    }
}

impl Default for Period {
    /// One month
    fn default() -> Self {
        Self {
            unit: PeriodUnit::Month,
            count: 1,
        }
    }
}

impl fmt::Display for Period {
    /// Formats as "1 day", "2 weeks", "1 month"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.count, self.unit)?;
        if self.count > 1 {
            f.write_str("s")?;
        }
        Ok(())
    }
}

/// Persisted shape of a period: unit name plus count, validated on the way in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedPeriod {
    pub unit: PeriodUnit,
    pub count: u32,
}

impl TryFrom<PersistedPeriod> for Period {
    type Error = BillingError;

    fn try_from(record: PersistedPeriod) -> Result<Self, Self::Error> {
        Period::new(record.unit, record.count)
    }
}

impl From<Period> for PersistedPeriod {
    fn from(period: Period) -> Self {
        PersistedPeriod {
            unit: period.unit,
            count: period.count,
        }
    }
}

/// A span of calendar time measured in whole units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarDuration {
    Days(u64),
    Weeks(u64),
    Months(u64),
    Years(u64),
}

impl CalendarDuration {
    pub fn is_zero(&self) -> bool {
        matches!(
            self,
            CalendarDuration::Days(0)
                | CalendarDuration::Weeks(0)
                | CalendarDuration::Months(0)
                | CalendarDuration::Years(0)
        )
    }

    /// Adds this duration to `date`
    ///
    /// Month and year steps clamp to the end of a shorter month, so
    /// January 31st plus one month is February 28th (or 29th).
    ///
    /// # Errors
    ///
    /// Returns `DateOutOfRange` if the result is not a representable date
    pub fn add_to(&self, date: NaiveDate) -> Result<NaiveDate, BillingError> {
        let result = match *self {
            CalendarDuration::Days(n) => date.checked_add_days(Days::new(n)),
            CalendarDuration::Weeks(n) => n
                .checked_mul(7)
                .and_then(|days| date.checked_add_days(Days::new(days))),
            CalendarDuration::Months(n) => u32::try_from(n)
                .ok()
                .and_then(|months| date.checked_add_months(Months::new(months))),
            CalendarDuration::Years(n) => n
                .checked_mul(12)
                .and_then(|months| u32::try_from(months).ok())
                .and_then(|months| date.checked_add_months(Months::new(months))),
        };
        result.ok_or_else(|| BillingError::DateOutOfRange(format!("{} + {}", date, self)))
    }
}

impl fmt::Display for CalendarDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarDuration::Days(n) => write!(f, "{} days", n),
            CalendarDuration::Weeks(n) => write!(f, "{} weeks", n),
            CalendarDuration::Months(n) => write!(f, "{} months", n),
            CalendarDuration::Years(n) => write!(f, "{} years", n),
        }
    }
}
