//! `FlatForward` — a yield term structure with a constant forward rate.

use crate::term_structure::TermStructure;
use crate::yield_term_structure::YieldTermStructure;
use ql_core::{DiscountFactor, Rate, Time};
use ql_time::{Date, DayCounter};
use std::sync::Arc;

/// A flat curve is usable for two centuries past its reference date.
const FLAT_HORIZON_DAYS: i32 = 73_050;

/// A flat, continuously-compounded yield curve: `P(t) = exp(-r t)`.
#[derive(Debug, Clone)]
pub struct FlatForward {
    reference_date: Date,
    day_counter: Arc<dyn DayCounter>,
    rate: Rate,
}

impl FlatForward {
    /// Create a flat curve with continuous rate `rate`.
    pub fn new(reference_date: Date, rate: Rate, day_counter: impl DayCounter + 'static) -> Self {
        Self {
            reference_date,
            day_counter: Arc::new(day_counter),
            rate,
        }
    }

    /// The continuously-compounded flat rate.
    pub fn rate(&self) -> Rate {
        self.rate
    }
}

impl TermStructure for FlatForward {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn day_counter(&self) -> &dyn DayCounter {
        &*self.day_counter
    }

    fn max_date(&self) -> Date {
        self.reference_date + FLAT_HORIZON_DAYS
    }
}

impl YieldTermStructure for FlatForward {
    fn discount_impl(&self, t: Time) -> DiscountFactor {
        (-self.rate * t).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_time::{Actual360, Actual365Fixed};

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn flat_rates() {
        let curve = FlatForward::new(date(2016, 10, 4), 0.03, Actual365Fixed);
        let d = date(2019, 10, 4);
        let t = curve.time_from_reference(d);
        assert_abs_diff_eq!(curve.discount_date(d), (-0.03 * t).exp(), epsilon = 1e-15);
        assert_abs_diff_eq!(curve.zero_rate(d), 0.03, epsilon = 1e-14);
        assert_abs_diff_eq!(curve.discount(0.0), 1.0);

        let (d1, d2) = (date(2017, 4, 4), date(2017, 10, 4));
        let tau = Actual360.year_fraction(d1, d2);
        let t1 = curve.time_from_reference(d1);
        let t2 = curve.time_from_reference(d2);
        let expected = ((0.03 * (t2 - t1)).exp() - 1.0) / tau;
        assert_abs_diff_eq!(curve.forward_rate(d1, d2, &Actual360), expected, epsilon = 1e-14);
    }
}
