//! Leg analytics against a discount curve.
//!
//! - `npv` — Σ amount · P(payment)
//! - `bps` — Σ nominal · τ · P(payment) · 1bp
//!
//! Coupons paying on or before the evaluation date are skipped.

use crate::cashflow::{FixingContext, Leg};
use ql_core::{errors::Result, Real};
use ql_termstructures::YieldTermStructure;
use ql_time::Date;

const BASIS_POINT: Real = 1.0e-4;

/// Start of the first accrual period.
pub fn start_date(leg: &Leg) -> Option<Date> {
    leg.iter().map(|c| c.accrual_start_date()).min()
}

/// Last payment date.
pub fn maturity_date(leg: &Leg) -> Option<Date> {
    leg.iter().map(|c| c.date()).max()
}

/// Latest date any coupon of the leg depends on.
pub fn latest_relevant_date(leg: &Leg) -> Result<Option<Date>> {
    let mut latest = None;
    for coupon in leg {
        let d = coupon.latest_relevant_date()?;
        latest = Some(latest.map_or(d, |l: Date| l.max(d)));
    }
    Ok(latest)
}

/// Net present value of a leg.
pub fn npv(leg: &Leg, discount: &dyn YieldTermStructure, ctx: &FixingContext<'_>) -> Result<Real> {
    let mut result = 0.0;
    for coupon in leg {
        if coupon.has_occurred(ctx.evaluation_date) {
            continue;
        }
        result += coupon.amount(ctx)? * discount.discount_date(coupon.date());
    }
    Ok(result)
}

/// Basis-point sensitivity: the NPV change of a 1bp move in the coupon rate.
pub fn bps(leg: &Leg, discount: &dyn YieldTermStructure, evaluation_date: Date) -> Real {
    leg.iter()
        .filter(|c| !c.has_occurred(evaluation_date))
        .map(|c| c.nominal() * c.accrual_period() * discount.discount_date(c.date()))
        .sum::<Real>()
        * BASIS_POINT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coupon::Coupon;
    use crate::fixed_rate_coupon::FixedRateCoupon;
    use approx::assert_abs_diff_eq;
    use ql_termstructures::FlatForward;
    use ql_time::{Actual365Fixed, DayCounter};
    use std::sync::Arc;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn fixed_leg() -> Leg {
        let dc: Arc<dyn DayCounter> = Arc::new(Actual365Fixed);
        let dates = [date(2016, 4, 4), date(2016, 10, 4), date(2017, 4, 4), date(2017, 10, 4)];
        dates
            .windows(2)
            .map(|w| {
                Arc::new(FixedRateCoupon::new(w[1], 100.0, 0.05, w[0], w[1], Arc::clone(&dc)))
                    as Arc<dyn Coupon>
            })
            .collect()
    }

    #[test]
    fn occurred_coupons_are_skipped() {
        let today = date(2016, 10, 4);
        let curve = FlatForward::new(today, 0.02, Actual365Fixed);
        let ctx = FixingContext::new(&curve, today);
        let leg = fixed_leg();
        let expected: Real = leg[1..]
            .iter()
            .map(|c| 100.0 * 0.05 * c.accrual_period() * curve.discount_date(c.date()))
            .sum();
        assert_abs_diff_eq!(npv(&leg, &curve, &ctx).unwrap(), expected, epsilon = 1e-12);
        // a fixed leg's NPV is its rate times BPS / 1bp
        assert_abs_diff_eq!(bps(&leg, &curve, today) * 0.05 / BASIS_POINT, expected, epsilon = 1e-12);
    }

    #[test]
    fn leg_dates() {
        let leg = fixed_leg();
        assert_eq!(start_date(&leg), Some(date(2016, 4, 4)));
        assert_eq!(maturity_date(&leg), Some(date(2017, 10, 4)));
        assert_eq!(latest_relevant_date(&leg).unwrap(), Some(date(2017, 10, 4)));
        assert_eq!(maturity_date(&Vec::new()), None);
    }
}
