//! `Schedule` — the accrual period boundaries of a coupon leg.
//!
//! Dates are generated in calendar time from the effective date
//! ([`DateGeneration::Forward`]) or from the termination date
//! ([`DateGeneration::Backward`]), then adjusted with the calendar. A short
//! stub, if any, ends up at the far end from the generation anchor.

use crate::business_day_convention::BusinessDayConvention;
use crate::calendar::Calendar;
use crate::date::Date;
use crate::period::Period;
use ql_core::errors::{Error, Result};

/// Date generation rule for schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateGeneration {
    /// Generate backward from the termination date.
    Backward,
    /// Generate forward from the effective date.
    Forward,
    /// Only the effective and termination dates.
    Zero,
}

/// An ordered sequence of adjusted accrual dates.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    dates: Vec<Date>,
}

impl Schedule {
    /// Build a schedule from an explicit, strictly increasing list of dates.
    pub fn from_dates(dates: Vec<Date>) -> Result<Self> {
        if dates.len() < 2 {
            return Err(Error::InvalidArgument(
                "a schedule needs at least two dates".into(),
            ));
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::InvalidArgument(
                "schedule dates must be strictly increasing".into(),
            ));
        }
        Ok(Self { dates })
    }

    /// All dates of the schedule.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Number of dates.
    pub fn size(&self) -> usize {
        self.dates.len()
    }

    /// The `i`-th date.
    pub fn date(&self, i: usize) -> Date {
        self.dates[i]
    }

    /// Effective date.
    pub fn start_date(&self) -> Date {
        self.dates[0]
    }

    /// Termination date.
    pub fn end_date(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }

    /// Accrual periods as `(start, end)` pairs.
    pub fn periods(&self) -> impl Iterator<Item = (Date, Date)> + '_ {
        self.dates.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Builder for [`Schedule`].
#[derive(Debug)]
pub struct ScheduleBuilder<'a> {
    effective_date: Date,
    termination_date: Date,
    tenor: Period,
    calendar: &'a dyn Calendar,
    convention: BusinessDayConvention,
    termination_convention: BusinessDayConvention,
    rule: DateGeneration,
    end_of_month: bool,
}

impl<'a> ScheduleBuilder<'a> {
    /// Begin building a schedule; defaults are Modified Following for
    /// every date and backward generation.
    pub fn new(
        effective_date: Date,
        termination_date: Date,
        tenor: Period,
        calendar: &'a dyn Calendar,
    ) -> Self {
        Self {
            effective_date,
            termination_date,
            tenor,
            calendar,
            convention: BusinessDayConvention::ModifiedFollowing,
            termination_convention: BusinessDayConvention::ModifiedFollowing,
            rule: DateGeneration::Backward,
            end_of_month: false,
        }
    }

    /// Convention for every date but the termination date.
    pub fn with_convention(mut self, c: BusinessDayConvention) -> Self {
        self.convention = c;
        self
    }

    /// Convention for the termination date.
    pub fn with_termination_convention(mut self, c: BusinessDayConvention) -> Self {
        self.termination_convention = c;
        self
    }

    /// Date generation rule.
    pub fn with_rule(mut self, rule: DateGeneration) -> Self {
        self.rule = rule;
        self
    }

    /// Snap dates to month ends when the anchor date is a month end.
    pub fn end_of_month(mut self, flag: bool) -> Self {
        self.end_of_month = flag;
        self
    }

    /// Generate the schedule.
    pub fn build(self) -> Result<Schedule> {
        let (start, end) = (self.effective_date, self.termination_date);
        if start >= end {
            return Err(Error::InvalidArgument(format!(
                "effective date {start} must be before termination date {end}"
            )));
        }
        if self.tenor.length <= 0 && self.rule != DateGeneration::Zero {
            return Err(Error::InvalidArgument(format!(
                "non-positive schedule tenor {}",
                self.tenor
            )));
        }

        let unadjusted = match self.rule {
            DateGeneration::Zero => vec![start, end],
            DateGeneration::Forward => self.roll_forward(start, end)?,
            DateGeneration::Backward => self.roll_backward(start, end)?,
        };

        let last = unadjusted.len() - 1;
        let mut dates: Vec<Date> = unadjusted
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let convention = if i == last {
                    self.termination_convention
                } else {
                    self.convention
                };
                self.calendar.adjust(*d, convention)
            })
            .collect();
        dates.dedup();
        Schedule::from_dates(dates)
    }

    fn step(&self, anchor: Date, n: i32) -> Result<Date> {
        let moved = anchor.advance(n * self.tenor.length, self.tenor.unit)?;
        if self.end_of_month
            && self.convention != BusinessDayConvention::Unadjusted
            && self.calendar.is_end_of_month(anchor)
        {
            return Ok(self.calendar.end_of_month(moved));
        }
        Ok(moved)
    }

    fn roll_forward(&self, start: Date, end: Date) -> Result<Vec<Date>> {
        let mut dates = vec![start];
        for n in 1.. {
            let next = self.step(start, n)?;
            if next >= end {
                break;
            }
            dates.push(next);
        }
        dates.push(end);
        Ok(dates)
    }

    fn roll_backward(&self, start: Date, end: Date) -> Result<Vec<Date>> {
        let mut dates = vec![end];
        for n in 1.. {
            let prev = self.step(end, -n)?;
            if prev <= start {
                break;
            }
            dates.push(prev);
        }
        dates.push(start);
        dates.reverse();
        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::WeekendsOnly;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn zero_rule_has_two_dates() {
        let cal = WeekendsOnly;
        let s = ScheduleBuilder::new(date(2023, 1, 2), date(2025, 1, 2), Period::years(1), &cal)
            .with_rule(DateGeneration::Zero)
            .build()
            .unwrap();
        assert_eq!(s.size(), 2);
    }

    #[test]
    fn rejects_inverted_dates() {
        let cal = WeekendsOnly;
        let r = ScheduleBuilder::new(date(2025, 1, 2), date(2023, 1, 2), Period::years(1), &cal).build();
        assert!(matches!(r, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn stub_position_depends_on_rule() {
        let cal = WeekendsOnly;
        let (start, end) = (date(2020, 1, 15), date(2021, 3, 15));
        let fwd = ScheduleBuilder::new(start, end, Period::months(6), &cal)
            .with_rule(DateGeneration::Forward)
            .build()
            .unwrap();
        assert_eq!(fwd.dates(), &[start, date(2020, 7, 15), date(2021, 1, 15), end]);
        let bwd = ScheduleBuilder::new(start, end, Period::months(6), &cal)
            .with_rule(DateGeneration::Backward)
            .build()
            .unwrap();
        assert_eq!(bwd.dates(), &[start, date(2020, 3, 16), date(2020, 9, 15), end]);
    }
}
