//! `Date` — a calendar date backed by `chrono::NaiveDate`.
//!
//! Month and year arithmetic clamps to the last day of the target month
//! (31 January + 1M = 28/29 February), which is the convention every
//! schedule and rate helper in the workspace relies on.

use chrono::{Datelike, Months, NaiveDate, Weekday};
use ql_core::errors::{Error, Result};

use crate::time_unit::TimeUnit;

/// A calendar date.
///
/// Cheap to copy; ordered chronologically.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(NaiveDate);

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl Date {
    /// Create a date from year, month (1–12) and day of month.
    pub fn from_ymd(year: u16, month: u8, day: u8) -> Result<Self> {
        NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
            .map(Date)
            .ok_or_else(|| Error::Date(format!("invalid date {year:04}-{month:02}-{day:02}")))
    }

    /// Wrap an existing `chrono::NaiveDate`.
    pub fn from_naive(date: NaiveDate) -> Self {
        Date(date)
    }

    /// The underlying `chrono::NaiveDate`.
    pub fn to_naive(self) -> NaiveDate {
        self.0
    }

    /// Year.
    pub fn year(&self) -> u16 {
        self.0.year() as u16
    }

    /// Month (1–12).
    pub fn month(&self) -> u8 {
        self.0.month() as u8
    }

    /// Day of month (1–31).
    pub fn day_of_month(&self) -> u8 {
        self.0.day() as u8
    }

    /// Day of year (1–366).
    pub fn day_of_year(&self) -> u16 {
        self.0.ordinal() as u16
    }

    /// Day of the week.
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Full English name of the weekday (e.g. `"Tuesday"`).
    pub fn weekday_name(&self) -> &'static str {
        match self.weekday() {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }

    /// Return `true` on Saturdays and Sundays.
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Advance by `n` units; month and year steps clamp to the month end.
    pub fn advance(self, n: i32, unit: TimeUnit) -> Result<Self> {
        let overflow = || Error::Date(format!("cannot advance {self} by {n} {unit}"));
        match unit {
            TimeUnit::Days => self.0.checked_add_signed(chrono::Duration::days(i64::from(n))),
            TimeUnit::Weeks => self.0.checked_add_signed(chrono::Duration::weeks(i64::from(n))),
            TimeUnit::Months | TimeUnit::Years => {
                let months = if unit == TimeUnit::Years { n * 12 } else { n };
                if months >= 0 {
                    self.0.checked_add_months(Months::new(months.unsigned_abs()))
                } else {
                    self.0.checked_sub_months(Months::new(months.unsigned_abs()))
                }
            }
        }
        .map(Date)
        .ok_or_else(overflow)
    }

    /// Last calendar day of this date's month.
    pub fn end_of_month(self) -> Self {
        let days = days_in_month(self.year(), self.month());
        Date(self.0.with_day(u32::from(days)).unwrap_or(self.0))
    }

    /// Return `true` if this is the last calendar day of its month.
    pub fn is_end_of_month(self) -> bool {
        self.day_of_month() == days_in_month(self.year(), self.month())
    }

    /// The `n`-th given weekday of a month (e.g. third Wednesday).
    pub fn nth_weekday(n: u8, weekday: Weekday, year: u16, month: u8) -> Result<Self> {
        NaiveDate::from_weekday_of_month_opt(i32::from(year), u32::from(month), weekday, n)
            .map(Date)
            .ok_or_else(|| {
                Error::Date(format!("no {n}-th {weekday} in {year:04}-{month:02}"))
            })
    }
}

impl std::ops::Add<i32> for Date {
    type Output = Date;
    fn add(self, rhs: i32) -> Self {
        Date(self.0 + chrono::Duration::days(i64::from(rhs)))
    }
}

impl std::ops::Sub<i32> for Date {
    type Output = Date;
    fn sub(self, rhs: i32) -> Self {
        Date(self.0 - chrono::Duration::days(i64::from(rhs)))
    }
}

/// Number of calendar days from `rhs` to `self`.
impl std::ops::Sub<Date> for Date {
    type Output = i32;
    fn sub(self, rhs: Date) -> i32 {
        (self.0 - rhs.0).num_days() as i32
    }
}

impl From<NaiveDate> for Date {
    fn from(d: NaiveDate) -> Self {
        Date(d)
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mon = MONTH_NAMES[usize::from(self.month()) - 1];
        write!(f, "{} {mon} {}", self.day_of_month(), self.year())
    }
}

impl std::fmt::Debug for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Date({})", self.0.format("%Y-%m-%d"))
    }
}

/// Whether a given year is a leap year.
pub fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a given month/year.
pub fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// Easter Sunday of `year` (anonymous Gregorian algorithm).
pub fn easter_sunday(year: u16) -> Date {
    let y = i32::from(year);
    let a = y % 19;
    let b = y / 100;
    let c = y % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    Date(
        NaiveDate::from_ymd_opt(y, month as u32, day as u32)
            .unwrap_or(NaiveDate::MIN),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn invalid_dates_are_rejected() {
        assert!(Date::from_ymd(2023, 2, 29).is_err());
        assert!(Date::from_ymd(2024, 13, 1).is_err());
        assert!(Date::from_ymd(2024, 2, 29).is_ok());
    }

    #[test]
    fn weekday_of_settlement() {
        let d = date(2016, 10, 4);
        assert_eq!(d.weekday(), Weekday::Tue);
        assert_eq!(d.weekday_name(), "Tuesday");
        assert!(date(2016, 10, 8).is_weekend());
    }

    #[test]
    fn advance_months_clamps() {
        let next = date(2023, 1, 31).advance(1, TimeUnit::Months).unwrap();
        assert_eq!(next, date(2023, 2, 28));
        let back = date(2024, 3, 31).advance(-1, TimeUnit::Months).unwrap();
        assert_eq!(back, date(2024, 2, 29));
        let years = date(2016, 10, 4).advance(5, TimeUnit::Years).unwrap();
        assert_eq!(years, date(2021, 10, 4));
    }

    #[test]
    fn end_of_month() {
        assert_eq!(date(2024, 2, 15).end_of_month(), date(2024, 2, 29));
        assert!(date(2016, 9, 30).is_end_of_month());
        assert!(!date(2016, 10, 30).is_end_of_month());
    }

    #[test]
    fn arithmetic() {
        let d = date(2023, 1, 1);
        assert_eq!(d + 31, date(2023, 2, 1));
        assert_eq!(date(2023, 2, 1) - d, 31);
        assert_eq!(d - 1, date(2022, 12, 31));
    }

    #[test]
    fn nth_weekday() {
        let d = Date::nth_weekday(3, Weekday::Wed, 2016, 12).unwrap();
        assert_eq!(d, date(2016, 12, 21));
        assert!(Date::nth_weekday(5, Weekday::Wed, 2024, 2).is_err());
    }

    #[test]
    fn easter_dates() {
        assert_eq!(easter_sunday(2016), date(2016, 3, 27));
        assert_eq!(easter_sunday(2017), date(2017, 4, 16));
        assert_eq!(easter_sunday(2019), date(2019, 4, 21));
        assert_eq!(easter_sunday(2024), date(2024, 3, 31));
    }

    #[test]
    fn display() {
        assert_eq!(date(2016, 10, 4).to_string(), "4 October 2016");
        assert_eq!(format!("{:?}", date(2016, 10, 4)), "Date(2016-10-04)");
    }
}
