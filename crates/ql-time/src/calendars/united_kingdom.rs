//! United Kingdom calendars.

use chrono::Weekday;

use crate::calendar::Calendar;
use crate::date::{easter_sunday, Date};

/// Which UK market the calendar describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UkMarket {
    /// Generic settlement calendar.
    #[default]
    Settlement,
    /// London Stock Exchange.
    Exchange,
}

/// United Kingdom calendar.
///
/// Holidays for both markets: weekends, New Year's Day (moved to Monday),
/// Good Friday, Easter Monday, the early May bank holiday (first Monday of
/// May), the spring bank holiday (last Monday of May), the summer bank
/// holiday (last Monday of August), Christmas and Boxing Day (moved to
/// Monday or Tuesday), plus the one-off royal and jubilee holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitedKingdom {
    market: UkMarket,
}

impl UnitedKingdom {
    /// Calendar for the given market.
    pub fn new(market: UkMarket) -> Self {
        Self { market }
    }

    /// London Stock Exchange calendar.
    pub fn exchange() -> Self {
        Self::new(UkMarket::Exchange)
    }

    /// The market this calendar describes.
    pub fn market(&self) -> UkMarket {
        self.market
    }
}

impl Calendar for UnitedKingdom {
    fn name(&self) -> &str {
        match self.market {
            UkMarket::Settlement => "UK settlement",
            UkMarket::Exchange => "London stock exchange",
        }
    }

    fn is_business_day(&self, date: Date) -> bool {
        let w = date.weekday();
        if matches!(w, Weekday::Sat | Weekday::Sun) {
            return false;
        }
        !(is_bank_holiday(date, w) || is_one_off_holiday(date))
    }
}

fn is_bank_holiday(date: Date, w: Weekday) -> bool {
    let (y, m, d) = (date.year(), date.month(), date.day_of_month());
    let monday = w == Weekday::Mon;
    let monday_or_tuesday = matches!(w, Weekday::Mon | Weekday::Tue);
    let easter = easter_sunday(y);

    // New Year's Day, possibly moved to Monday
    (m == 1 && (d == 1 || ((d == 2 || d == 3) && monday)))
        // Good Friday, Easter Monday
        || date == easter - 2
        || date == easter + 1
        // early May bank holiday, moved to VE day in 1995 and 2020
        || (m == 5 && d <= 7 && monday && y != 1995 && y != 2020)
        // spring bank holiday, moved for the jubilees
        || (m == 5 && d >= 25 && monday && !matches!(y, 2002 | 2012 | 2022))
        // summer bank holiday
        || (m == 8 && d >= 25 && monday)
        // Christmas and Boxing Day, possibly moved to Monday or Tuesday
        || (m == 12 && (d == 25 || (d == 27 && monday_or_tuesday)))
        || (m == 12 && (d == 26 || (d == 28 && monday_or_tuesday)))
}

fn is_one_off_holiday(date: Date) -> bool {
    let ymd = (date.year(), date.month(), date.day_of_month());
    matches!(
        ymd,
        (1995, 5, 8)
            | (1999, 12, 31)
            | (2002, 6, 3)
            | (2002, 6, 4)
            | (2011, 4, 29)
            | (2012, 6, 4)
            | (2012, 6, 5)
            | (2020, 5, 8)
            | (2022, 6, 2)
            | (2022, 6, 3)
            | (2022, 9, 19)
            | (2023, 5, 8)
    )
}
