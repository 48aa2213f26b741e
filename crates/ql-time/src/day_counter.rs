//! `DayCounter` trait and the day-count conventions used by the deposit,
//! swap and curve conventions of the workflow.
//!
//! A day counter computes the fraction of a year between two dates, used
//! when accruing coupons and when mapping curve dates to times.

use crate::date::{is_leap_year, Date};
use ql_core::{Real, Time};

/// A convention for counting the fraction of a year between two dates.
pub trait DayCounter: std::fmt::Debug + Send + Sync {
    /// Human-readable name (e.g. `"Actual/365 (Fixed)"`).
    fn name(&self) -> &str;

    /// Number of days between `d1` and `d2` under this convention.
    fn day_count(&self, d1: Date, d2: Date) -> i64 {
        i64::from(d2 - d1)
    }

    /// Fraction of a year between `d1` and `d2`.
    fn year_fraction(&self, d1: Date, d2: Date) -> Time;
}

/// Actual/365 (Fixed).
#[derive(Debug, Clone, Copy, Default)]
pub struct Actual365Fixed;

impl DayCounter for Actual365Fixed {
    fn name(&self) -> &str {
        "Actual/365 (Fixed)"
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        self.day_count(d1, d2) as Real / 365.0
    }
}

/// Actual/360.
#[derive(Debug, Clone, Copy, Default)]
pub struct Actual360;

impl DayCounter for Actual360 {
    fn name(&self) -> &str {
        "Actual/360"
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        self.day_count(d1, d2) as Real / 360.0
    }
}

/// Day-of-month rule applied by [`Thirty360`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Thirty360Convention {
    /// 30/360 bond basis: a 31st start becomes the 30th; a 31st end becomes
    /// the 30th only when the start is the 30th or 31st.
    #[default]
    BondBasis,
    /// 30E/360 (Eurobond basis): every 31st becomes the 30th.
    European,
}

/// 30/360 day counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Thirty360 {
    convention: Thirty360Convention,
}

impl Thirty360 {
    /// 30/360 with the given day-of-month rule.
    pub fn new(convention: Thirty360Convention) -> Self {
        Self { convention }
    }

    /// 30E/360.
    pub fn european() -> Self {
        Self::new(Thirty360Convention::European)
    }
}

impl DayCounter for Thirty360 {
    fn name(&self) -> &str {
        match self.convention {
            Thirty360Convention::BondBasis => "30/360 (Bond Basis)",
            Thirty360Convention::European => "30E/360 (Eurobond Basis)",
        }
    }

    fn day_count(&self, d1: Date, d2: Date) -> i64 {
        let mut dd1 = i64::from(d1.day_of_month());
        let mut dd2 = i64::from(d2.day_of_month());
        match self.convention {
            Thirty360Convention::BondBasis => {
                if dd1 == 31 {
                    dd1 = 30;
                }
                if dd2 == 31 && dd1 >= 30 {
                    dd2 = 30;
                }
            }
            Thirty360Convention::European => {
                dd1 = dd1.min(30);
                dd2 = dd2.min(30);
            }
        }
        let years = i64::from(d2.year()) - i64::from(d1.year());
        let months = i64::from(d2.month()) - i64::from(d1.month());
        360 * years + 30 * months + (dd2 - dd1)
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        self.day_count(d1, d2) as Real / 360.0
    }
}

/// Actual/Actual (ISDA): days in leap years are divided by 366, other days
/// by 365, so a calendar year starting on 1 January counts as exactly 1.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActualActualIsda;

impl DayCounter for ActualActualIsda {
    fn name(&self) -> &str {
        "Actual/Actual (ISDA)"
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        if d1 == d2 {
            return 0.0;
        }
        if d1 > d2 {
            return -self.year_fraction(d2, d1);
        }
        let basis = |y: u16| if is_leap_year(y) { 366.0 } else { 365.0 };
        let (y1, y2) = (d1.year(), d2.year());
        if y1 == y2 {
            return (d2 - d1) as Real / basis(y1);
        }
        let (Ok(next_year), Ok(last_year)) = (Date::from_ymd(y1 + 1, 1, 1), Date::from_ymd(y2, 1, 1))
        else {
            return (d2 - d1) as Real / 365.0;
        };
        (next_year - d1) as Real / basis(y1)
            + Real::from(y2 - y1 - 1)
            + (d2 - last_year) as Real / basis(y2)
    }
}
