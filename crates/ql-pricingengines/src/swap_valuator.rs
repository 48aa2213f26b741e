//! Discounting swap valuation.
//!
//! Prices a vanilla swap by discounting every coupon still to be paid:
//!
//! $$\text{NPV} = \phi \left(\sum_j c_j^{\text{flt}} d(t_j) -
//!   \sum_i c_i^{\text{fix}} d(t_i)\right)$$
//!
//! where $\phi = +1$ for a payer swap and $-1$ for a receiver. Floating
//! coupons are fixed off the forecasting curve; everything is discounted on
//! the discounting curve.

use ql_cashflows::{bps, npv, FixingContext};
use ql_core::{
    errors::{Error, Result},
    Rate, Real, Spread,
};
use ql_instruments::VanillaSwap;
use ql_termstructures::{CurveRegistry, YieldTermStructure};
use ql_time::Date;
use tracing::debug;

const BASIS_POINT: Real = 1.0e-4;

/// Valuation of one swap under one pair of curves at one evaluation date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuationResult {
    /// Net present value from the swap holder's side.
    pub npv: Real,
    /// Fixed rate that sets the NPV to zero.
    pub fair_rate: Rate,
    /// Floating spread that sets the NPV to zero.
    pub fair_spread: Spread,
    /// Present value of the fixed leg (unsigned).
    pub fixed_leg_npv: Real,
    /// Present value of the floating leg (unsigned).
    pub floating_leg_npv: Real,
    /// Fixed leg BPS (unsigned).
    pub fixed_leg_bps: Real,
    /// Floating leg BPS (unsigned).
    pub floating_leg_bps: Real,
}

/// Discounting valuation of vanilla swaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapValuator;

impl SwapValuator {
    /// Create a valuator.
    pub fn new() -> Self {
        Self
    }

    /// Price `swap` against the curves currently linked to `discount` and
    /// `forecast`.
    ///
    /// # Errors
    /// [`Error::UnlinkedReference`] if either registry is unlinked, plus
    /// anything [`price_with_curves`](Self::price_with_curves) reports.
    pub fn price(
        &self,
        swap: &VanillaSwap,
        discount: &CurveRegistry,
        forecast: &CurveRegistry,
        evaluation_date: Date,
    ) -> Result<ValuationResult> {
        let discount_curve = discount.resolve()?;
        let forecast_curve = forecast.resolve()?;
        self.price_with_curves(swap, &*discount_curve, &*forecast_curve, evaluation_date)
    }

    /// Price `swap` against explicit curves.
    ///
    /// # Errors
    /// [`Error::MissingFixing`] for a past fixing with no recorded value,
    /// [`Error::Precondition`] if a leg has no remaining coupon.
    pub fn price_with_curves(
        &self,
        swap: &VanillaSwap,
        discount: &dyn YieldTermStructure,
        forecast: &dyn YieldTermStructure,
        evaluation_date: Date,
    ) -> Result<ValuationResult> {
        let ctx = FixingContext::new(forecast, evaluation_date);
        let fixed_leg_npv = npv(swap.fixed_leg(), discount, &ctx)?;
        let floating_leg_npv = npv(swap.floating_leg(), discount, &ctx)?;
        let fixed_leg_bps = bps(swap.fixed_leg(), discount, evaluation_date);
        let floating_leg_bps = bps(swap.floating_leg(), discount, evaluation_date);

        let npv = swap.fixed_leg_sign() * fixed_leg_npv + swap.floating_leg_sign() * floating_leg_npv;

        if fixed_leg_bps == 0.0 {
            return Err(Error::Precondition(
                "fixed leg has no remaining coupon: fair rate undefined".into(),
            ));
        }
        if floating_leg_bps == 0.0 {
            return Err(Error::Precondition(
                "floating leg has no remaining coupon: fair spread undefined".into(),
            ));
        }
        let fair_rate =
            swap.fixed_rate() - npv / (swap.fixed_leg_sign() * fixed_leg_bps / BASIS_POINT);
        let fair_spread =
            swap.spread() - npv / (swap.floating_leg_sign() * floating_leg_bps / BASIS_POINT);

        debug!(
            %evaluation_date,
            npv,
            fair_rate,
            fair_spread,
            "swap priced"
        );

        Ok(ValuationResult {
            npv,
            fair_rate,
            fair_spread,
            fixed_leg_npv,
            floating_leg_npv,
            fixed_leg_bps,
            floating_leg_bps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_indexes::{euribor_months, Index};
    use ql_instruments::MakeVanillaSwap;
    use ql_termstructures::FlatForward;
    use ql_time::{
        Actual365Fixed, BusinessDayConvention, DateGeneration, Period, Thirty360, UnitedKingdom,
    };
    use std::sync::Arc;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn today() -> Date {
        date(2016, 10, 4)
    }

    fn swap(start: Date, end: Date, fixed_rate: Rate) -> MakeVanillaSwap {
        MakeVanillaSwap::new(Period::years(5), Arc::new(euribor_months(6)), fixed_rate, Period::months(0))
            .with_effective_date(start)
            .with_termination_date(end)
            .with_nominal(1_000_000.0)
            .with_calendar(Arc::new(UnitedKingdom::exchange()))
            .with_fixed_leg_convention(BusinessDayConvention::Unadjusted)
            .with_fixed_leg_termination_date_convention(BusinessDayConvention::Unadjusted)
            .with_fixed_leg_rule(DateGeneration::Forward)
            .with_fixed_leg_day_count(Arc::new(Thirty360::european()))
            .with_floating_leg_rule(DateGeneration::Forward)
    }

    fn forward_swap(fixed_rate: Rate) -> VanillaSwap {
        swap(date(2017, 10, 4), date(2022, 10, 4), fixed_rate).build().unwrap()
    }

    fn curve(rate: Real) -> Arc<dyn YieldTermStructure> {
        Arc::new(FlatForward::new(today(), rate, Actual365Fixed))
    }

    #[test]
    fn pricing_at_fair_rate_gives_zero_npv() {
        let c = curve(0.02);
        let valuator = SwapValuator::new();
        let r = valuator.price_with_curves(&forward_swap(0.04), &*c, &*c, today()).unwrap();
        assert!(r.npv < 0.0, "payer of 4% on a 2% curve loses, npv = {}", r.npv);
        let fair = valuator
            .price_with_curves(&forward_swap(r.fair_rate), &*c, &*c, today())
            .unwrap();
        assert_abs_diff_eq!(fair.npv, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(r.fair_rate, r.floating_leg_npv / (r.fixed_leg_bps / BASIS_POINT), epsilon = 1e-14);
    }

    #[test]
    fn fair_spread_zeroes_npv() {
        let c = curve(0.015);
        let valuator = SwapValuator::new();
        let r = valuator.price_with_curves(&forward_swap(0.04), &*c, &*c, today()).unwrap();
        let spread_swap = swap(date(2017, 10, 4), date(2022, 10, 4), 0.04)
            .with_floating_leg_spread(r.fair_spread)
            .build()
            .unwrap();
        let s = valuator.price_with_curves(&spread_swap, &*c, &*c, today()).unwrap();
        assert_abs_diff_eq!(s.npv, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(s.fair_spread, r.fair_spread, epsilon = 1e-12);
    }

    #[test]
    fn payer_and_receiver_are_exact_negatives() {
        let c = curve(0.01);
        let payer = forward_swap(0.04);
        let receiver = payer.reversed();
        let valuator = SwapValuator::new();
        let p = valuator.price_with_curves(&payer, &*c, &*c, today()).unwrap();
        let r = valuator.price_with_curves(&receiver, &*c, &*c, today()).unwrap();
        assert_eq!(p.npv, -r.npv);
        assert_abs_diff_eq!(p.fair_rate, r.fair_rate, epsilon = 1e-15);
        assert_abs_diff_eq!(p.fair_spread, r.fair_spread, epsilon = 1e-15);
    }

    #[test]
    fn spot_swap_needs_the_last_euribor_fixing() {
        let c = curve(0.01);
        let spot = swap(today(), date(2021, 10, 4), 0.04).build().unwrap();
        let valuator = SwapValuator::new();
        let err = valuator.price_with_curves(&spot, &*c, &*c, today()).unwrap_err();
        assert!(matches!(err, Error::MissingFixing { .. }));
        spot.index().add_fixing(date(2016, 9, 30), -0.00201);
        assert!(valuator.price_with_curves(&spot, &*c, &*c, today()).is_ok());
    }

    #[test]
    fn registries_resolve_the_latest_link() {
        let discount = CurveRegistry::new("discounting");
        let forecast = CurveRegistry::new("forecasting");
        let valuator = SwapValuator::new();
        let s = forward_swap(0.04);
        assert_eq!(
            valuator.price(&s, &discount, &forecast, today()).unwrap_err(),
            Error::UnlinkedReference("discounting".into())
        );
        let (a, b) = (curve(0.01), curve(0.03));
        discount.link_to(Arc::clone(&a));
        forecast.link_to(Arc::clone(&a));
        discount.link_to(Arc::clone(&b));
        forecast.link_to(Arc::clone(&b));
        let via_registry = valuator.price(&s, &discount, &forecast, today()).unwrap();
        let direct = valuator.price_with_curves(&s, &*b, &*b, today()).unwrap();
        assert_eq!(via_registry, direct);
    }

    #[test]
    fn expired_swap_is_rejected() {
        let c = curve(0.01);
        let s = forward_swap(0.04);
        let after = date(2023, 1, 2);
        let late = Arc::new(FlatForward::new(after, 0.01, Actual365Fixed));
        let r = SwapValuator::new().price_with_curves(&s, &*late, &*late, after);
        assert!(matches!(r, Err(Error::Precondition(_))));
        assert!(SwapValuator::new().price_with_curves(&s, &*c, &*c, today()).is_ok());
    }
}
