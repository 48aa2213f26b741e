//! `YieldTermStructure` — yield / interest-rate term structures.
//!
//! Implementors provide the discount factor as a function of time; zero
//! rates and forward rates follow from it:
//!
//! * **zero rate** — continuously compounded, `-ln P(t) / t`
//! * **forward rate** — simply compounded between two dates under a given
//!   day counter, `(P(d1)/P(d2) - 1) / τ(d1, d2)`

use crate::term_structure::TermStructure;
use ql_core::{DiscountFactor, Rate, Time};
use ql_time::{Date, DayCounter};

/// Small time step used for the zero rate at the reference date.
const DT: Time = 1.0e-4;

/// A yield (interest-rate) term structure.
pub trait YieldTermStructure: TermStructure {
    /// Discount factor for time `t` from the reference date.
    fn discount_impl(&self, t: Time) -> DiscountFactor;

    /// Discount factor for a time.
    fn discount(&self, t: Time) -> DiscountFactor {
        if t == 0.0 {
            return 1.0;
        }
        self.discount_impl(t)
    }

    /// Discount factor for a date.
    fn discount_date(&self, date: Date) -> DiscountFactor {
        self.discount(self.time_from_reference(date))
    }

    /// Continuously-compounded zero rate to `date`.
    fn zero_rate(&self, date: Date) -> Rate {
        let t = self.time_from_reference(date);
        let t = if t == 0.0 { DT } else { t };
        -self.discount(t).ln() / t
    }

    /// Simply-compounded forward rate between `d1` and `d2`, accrued with `dc`.
    fn forward_rate(&self, d1: Date, d2: Date, dc: &dyn DayCounter) -> Rate {
        let tau = dc.year_fraction(d1, d2);
        (self.discount_date(d1) / self.discount_date(d2) - 1.0) / tau
    }
}
