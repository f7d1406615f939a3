//! The billing cycle in effect on a given date

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use crate::error::BillingError;
use crate::period::{Period, PeriodUnit};

/// Snapshot of the cycle containing a reference date
///
/// Computed fresh for each reference date and never cached. `end` is the
/// start of the following cycle, so the cycle covers `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentCycle {
    /// Complete periods elapsed since billing started
    pub cycle_number: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CurrentCycle {
    /// Calculates the cycle containing `today` for a schedule whose first
    /// cycle starts on `billing_start`
    ///
    /// Each boundary is measured from `billing_start` rather than chained
    /// from the previous cycle, so a schedule anchored on the 31st returns
    /// to the 31st after passing through shorter months. In particular `end`
    /// is `billing_start + (n + 1)` periods, not `start + 1` period. The two
    /// only differ when `start` was clamped to a short month's last day
    /// (Jan 31 anchor: Feb 28 + 1 month is Mar 28, the anchor gives Mar 31),
    /// and measuring from the anchor keeps `today` within `[start, end)`.
    pub fn calculate(
        period: &Period,
        billing_start: NaiveDate,
        today: NaiveDate,
    ) -> Result<Self, BillingError> {
        let cycle_number = Self::calculate_cycle_number(period, billing_start, today);
        let start = period.duration_for(cycle_number).add_to(billing_start)?;
        let next = cycle_number
            .checked_add(1)
            .ok_or_else(|| BillingError::DateOutOfRange(format!("cycle after {}", cycle_number)))?;
        let end = period.duration_for(next).add_to(billing_start)?;

        Ok(Self {
            cycle_number,
            start,
            end,
        })
    }

    /// Number of complete periods between `billing_start` and `today`
    ///
    /// Elapsed time is counted in whole calendar units of the period (days,
    /// weeks, months or years) and divided by the period's count. A date
    /// before `billing_start` yields 0.
    pub fn calculate_cycle_number(period: &Period, billing_start: NaiveDate, today: NaiveDate) -> u32 {
        if today <= billing_start {
            return 0;
        }

        let elapsed = match period.unit() {
            PeriodUnit::Day => whole_days_between(billing_start, today),
            PeriodUnit::Week => whole_days_between(billing_start, today) / 7,
            PeriodUnit::Month => whole_months_between(billing_start, today),
            PeriodUnit::Year => whole_months_between(billing_start, today) / 12,
        };

        u32::try_from(elapsed / u64::from(period.count())).unwrap_or(u32::MAX)
    }

    /// Returns true if `date` falls within `[start, end)`
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    pub fn as_range(&self) -> Range<NaiveDate> {
        self.start..self.end
    }
}

impl fmt::Display for CurrentCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cycle {} [{}, {})", self.cycle_number, self.start, self.end)
    }
}

fn whole_days_between(from: NaiveDate, to: NaiveDate) -> u64 {
    u64::try_from((to - from).num_days()).unwrap_or(0)
}

/// Whole months from `from` to `to`, where a month is complete once adding
/// it to `from` (clamped to month end) does not pass `to`
fn whole_months_between(from: NaiveDate, to: NaiveDate) -> u64 {
    let approx = i64::from(to.year() - from.year()) * 12 + i64::from(to.month()) - i64::from(from.month());
    let Ok(mut months) = u32::try_from(approx) else {
        return 0;
    };

    // the calendar-month difference overshoots when `to` is earlier in its month
    let reached = from.checked_add_months(Months::new(months));
    if months > 0 && reached.map_or(true, |date| date > to) {
        months -= 1;
    }
    u64::from(months)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_whole_months_between() {
        assert_eq!(whole_months_between(date(2010, 1, 1), date(2010, 1, 31)), 0);
        assert_eq!(whole_months_between(date(2010, 1, 15), date(2010, 2, 14)), 0);
        assert_eq!(whole_months_between(date(2010, 1, 15), date(2010, 2, 15)), 1);
        assert_eq!(whole_months_between(date(2010, 1, 31), date(2010, 2, 28)), 1);
        assert_eq!(whole_months_between(date(2010, 1, 31), date(2010, 3, 30)), 1);
        assert_eq!(whole_months_between(date(2010, 1, 1), date(2011, 2, 1)), 13);
    }

    #[test]
    fn test_boundaries_measured_from_anchor() {
        let period = Period::months(1).unwrap();
        let current = CurrentCycle::calculate(&period, date(2010, 1, 31), date(2010, 3, 30)).unwrap();
        assert_eq!(current.cycle_number, 1);
        assert_eq!(current.start, date(2010, 2, 28));
        assert_eq!(current.end, date(2010, 3, 31));
        assert!(current.contains(date(2010, 3, 30)));
    }

    #[test]
    fn test_before_billing_start_is_cycle_zero() {
        let period = Period::days(5).unwrap();
        let current = CurrentCycle::calculate(&period, date(2010, 1, 10), date(2010, 1, 1)).unwrap();
        assert_eq!(current.cycle_number, 0);
        assert_eq!(current.start, date(2010, 1, 10));
        assert!(!current.contains(date(2010, 1, 1)));
    }

    #[test]
    fn test_display() {
        let period = Period::days(5).unwrap();
        let current = CurrentCycle::calculate(&period, date(2010, 1, 1), date(2010, 1, 11)).unwrap();
        assert_eq!(current.to_string(), "cycle 2 [2010-01-11, 2010-01-16)");
    }
}
