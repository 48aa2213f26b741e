//! IMM dates: the third Wednesday of a month, main cycle March, June,
//! September and December. Short-rate futures start on them.

use chrono::Weekday;
use ql_core::errors::Result;

use crate::date::Date;

/// IMM date utilities.
#[derive(Debug, Clone, Copy)]
pub struct IMM;

impl IMM {
    /// Return `true` if `date` is an IMM date.
    ///
    /// With `main_cycle` only March, June, September and December qualify.
    pub fn is_imm_date(date: Date, main_cycle: bool) -> bool {
        if date.weekday() != Weekday::Wed || !(15..=21).contains(&date.day_of_month()) {
            return false;
        }
        !main_cycle || date.month() % 3 == 0
    }

    /// First IMM date strictly after `date`.
    pub fn next_date(date: Date, main_cycle: bool) -> Result<Date> {
        let offset: u8 = if main_cycle { 3 } else { 1 };
        let (mut y, mut m) = (date.year(), date.month());
        let skip = offset - (m % offset);
        if skip != offset || date.day_of_month() > 21 {
            let next = m + skip;
            if next <= 12 {
                m = next;
            } else {
                m = next - 12;
                y += 1;
            }
        }
        let candidate = Date::nth_weekday(3, Weekday::Wed, y, m)?;
        if candidate <= date {
            return Self::next_date(Date::from_ymd(y, m, 22)?, main_cycle);
        }
        Ok(candidate)
    }

    /// The first `n` consecutive IMM dates after `date`.
    pub fn next_dates(date: Date, n: usize, main_cycle: bool) -> Result<Vec<Date>> {
        let mut out = Vec::with_capacity(n);
        let mut current = date;
        for _ in 0..n {
            current = Self::next_date(current, main_cycle)?;
            out.push(current);
        }
        Ok(out)
    }

    /// IMM code for a main-cycle date (e.g. `"Z6"` for December 2016).
    pub fn code(date: Date) -> Option<String> {
        if !Self::is_imm_date(date, true) {
            return None;
        }
        let month_code = match date.month() {
            3 => 'H',
            6 => 'M',
            9 => 'U',
            _ => 'Z',
        };
        Some(format!("{month_code}{}", date.year() % 10))
    }
}
