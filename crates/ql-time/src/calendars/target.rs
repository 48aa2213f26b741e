//! TARGET calendar (Trans-European Automated Real-time Gross settlement
//! Express Transfer system), used by the Euribor fixings.

use chrono::Weekday;

use crate::calendar::Calendar;
use crate::date::{easter_sunday, Date};

/// TARGET calendar.
///
/// Holidays: Saturdays and Sundays, New Year's Day, Good Friday and Easter
/// Monday (since 2000), Labour Day (since 2000), Christmas, Day of Goodwill
/// (since 2000), and 31 December in 1998, 1999 and 2001.
#[derive(Debug, Clone, Copy, Default)]
pub struct Target;

impl Calendar for Target {
    fn name(&self) -> &str {
        "TARGET"
    }

    fn is_business_day(&self, date: Date) -> bool {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        let (y, m, d) = (date.year(), date.month(), date.day_of_month());
        let easter = easter_sunday(y);
        let holiday = (d == 1 && m == 1)
            || (y >= 2000 && (date == easter - 2 || date == easter + 1))
            || (y >= 2000 && d == 1 && m == 5)
            || (d == 25 && m == 12)
            || (y >= 2000 && d == 26 && m == 12)
            || (d == 31 && m == 12 && matches!(y, 1998 | 1999 | 2001));
        !holiday
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn target_holidays_2016() {
        let cal = Target;
        for d in [
            date(2016, 1, 1),
            date(2016, 3, 25),
            date(2016, 3, 28),
            date(2016, 12, 26),
        ] {
            assert!(cal.is_holiday(d), "{d} should be a TARGET holiday");
        }
        // 3 October is a German holiday but not a TARGET one.
        assert!(cal.is_business_day(date(2016, 10, 3)));
    }
}
