//! `Calendar` trait plus the two holiday-free calendars.
//!
//! A calendar only has to say whether a date is a business day; date
//! adjustment and advancing are provided on top of that.

use crate::business_day_convention::BusinessDayConvention;
use crate::date::Date;
use crate::period::Period;
use crate::time_unit::TimeUnit;
use ql_core::errors::Result;

/// A holiday calendar.
pub trait Calendar: std::fmt::Debug + Send + Sync {
    /// Name of the calendar (e.g. `"TARGET"`).
    fn name(&self) -> &str;

    /// Return `true` if `date` is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Return `true` if `date` is a holiday or weekend.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Return `true` if `date` is the last business day of its month.
    fn is_end_of_month(&self, date: Date) -> bool {
        date.month() != self.adjust(date + 1, BusinessDayConvention::Following).month()
    }

    /// Last business day of the month containing `date`.
    fn end_of_month(&self, date: Date) -> Date {
        self.adjust(date.end_of_month(), BusinessDayConvention::Preceding)
    }

    /// Adjust `date` according to a business-day convention.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> Date {
        match convention {
            BusinessDayConvention::Unadjusted => date,
            BusinessDayConvention::Following => roll(self, date, 1),
            BusinessDayConvention::Preceding => roll(self, date, -1),
            BusinessDayConvention::ModifiedFollowing => {
                let adjusted = roll(self, date, 1);
                if adjusted.month() != date.month() {
                    roll(self, date, -1)
                } else {
                    adjusted
                }
            }
            BusinessDayConvention::ModifiedPreceding => {
                let adjusted = roll(self, date, -1);
                if adjusted.month() != date.month() {
                    roll(self, date, 1)
                } else {
                    adjusted
                }
            }
        }
    }

    /// Advance `date` by `n` business days (negative `n` moves backward).
    fn advance_business_days(&self, mut date: Date, n: i32) -> Date {
        let step = n.signum();
        let mut remaining = n.abs();
        while remaining > 0 {
            date = date + step;
            if self.is_business_day(date) {
                remaining -= 1;
            }
        }
        date
    }

    /// Advance `date` by `n` units.
    ///
    /// Day steps count business days (zero days adjusts the date). Week,
    /// month and year steps move in calendar time and then adjust; with
    /// `end_of_month` set, a start on the last business day of a month
    /// lands on the last business day of the target month.
    fn advance(
        &self,
        date: Date,
        n: i32,
        unit: TimeUnit,
        convention: BusinessDayConvention,
        end_of_month: bool,
    ) -> Result<Date> {
        match unit {
            TimeUnit::Days if n == 0 => Ok(self.adjust(date, convention)),
            TimeUnit::Days => Ok(self.advance_business_days(date, n)),
            TimeUnit::Weeks => Ok(self.adjust(date.advance(n, unit)?, convention)),
            TimeUnit::Months | TimeUnit::Years => {
                let moved = date.advance(n, unit)?;
                if end_of_month && self.is_end_of_month(date) {
                    Ok(self.end_of_month(moved))
                } else {
                    Ok(self.adjust(moved, convention))
                }
            }
        }
    }

    /// [`advance`](Self::advance) by a [`Period`].
    fn advance_period(
        &self,
        date: Date,
        period: Period,
        convention: BusinessDayConvention,
        end_of_month: bool,
    ) -> Result<Date> {
        self.advance(date, period.length, period.unit, convention, end_of_month)
    }
}

fn roll<C: Calendar + ?Sized>(calendar: &C, mut date: Date, step: i32) -> Date {
    while calendar.is_holiday(date) {
        date = date + step;
    }
    date
}

/// Every day is a business day.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCalendar;

impl Calendar for NullCalendar {
    fn name(&self) -> &str {
        "Null"
    }

    fn is_business_day(&self, _date: Date) -> bool {
        true
    }
}

/// Saturdays and Sundays are the only holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendsOnly;

impl Calendar for WeekendsOnly {
    fn name(&self) -> &str {
        "Weekends only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn null_calendar_never_adjusts() {
        let sat = date(2023, 12, 30);
        assert_eq!(NullCalendar.adjust(sat, BusinessDayConvention::Following), sat);
    }

    #[test]
    fn modified_following_stays_in_month() {
        let cal = WeekendsOnly;
        // Saturday 30 September 2023 rolls back to Friday 29th.
        let adj = cal.adjust(date(2023, 9, 30), BusinessDayConvention::ModifiedFollowing);
        assert_eq!(adj, date(2023, 9, 29));
        let adj = cal.adjust(date(2023, 9, 16), BusinessDayConvention::ModifiedFollowing);
        assert_eq!(adj, date(2023, 9, 18));
    }

    #[test]
    fn advance_business_days_skips_weekend() {
        let cal = WeekendsOnly;
        assert_eq!(cal.advance_business_days(date(2016, 10, 4), -2), date(2016, 9, 30));
        assert_eq!(cal.advance_business_days(date(2016, 10, 7), 1), date(2016, 10, 10));
    }

    #[test]
    fn advance_end_of_month() {
        let cal = WeekendsOnly;
        // 30 September 2016 is the last business day of September.
        let d = cal
            .advance(date(2016, 9, 30), 1, TimeUnit::Months, BusinessDayConvention::ModifiedFollowing, true)
            .unwrap();
        assert_eq!(d, date(2016, 10, 31));
        let d = cal
            .advance(date(2016, 9, 30), 1, TimeUnit::Months, BusinessDayConvention::ModifiedFollowing, false)
            .unwrap();
        assert_eq!(d, date(2016, 10, 31));
        let d = cal
            .advance(date(2016, 10, 4), 0, TimeUnit::Days, BusinessDayConvention::Following, false)
            .unwrap();
        assert_eq!(d, date(2016, 10, 4));
    }
}
