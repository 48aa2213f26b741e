//! `InterpolatedDiscountCurve` — a yield term structure defined by discount
//! factors at pillar dates.
//!
//! The curve stores `(date, discount)` pairs and interpolates them in log
//! space as a function of time. Beyond the last pillar the last segment is
//! extended linearly in `ln P`, which keeps the curve defined while a
//! bootstrap is still adding pillars.

use crate::term_structure::TermStructure;
use crate::yield_term_structure::YieldTermStructure;
use ql_core::{ensure, errors::Result, DiscountFactor, Error, Real, Time};
use ql_math::{Interpolation1D, LogInterpolation};
use ql_time::{Date, DayCounter};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Interpolation scheme on discount factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InterpolationPolicy {
    /// Linear in `ln P` — piecewise flat instantaneous forwards.
    #[default]
    LogLinear,
    /// Natural cubic spline in `ln P` (zero second derivative at both ends).
    LogCubicNatural,
}

impl InterpolationPolicy {
    /// Return `true` if moving one node only affects its adjacent segments.
    ///
    /// A bootstrap over a local scheme is exact after a single sweep.
    pub fn is_local(self) -> bool {
        matches!(self, InterpolationPolicy::LogLinear)
    }

    fn build(self, times: &[Time], discounts: &[DiscountFactor]) -> Result<Box<dyn Interpolation1D>> {
        Ok(match self {
            InterpolationPolicy::LogLinear => Box::new(LogInterpolation::log_linear(times, discounts)?),
            InterpolationPolicy::LogCubicNatural => {
                Box::new(LogInterpolation::log_cubic(times, discounts)?)
            }
        })
    }
}

impl fmt::Display for InterpolationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InterpolationPolicy::LogLinear => "log-linear",
            InterpolationPolicy::LogCubicNatural => "log-cubic",
        })
    }
}

impl FromStr for InterpolationPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "log-linear" | "loglinear" => Ok(InterpolationPolicy::LogLinear),
            "log-cubic" | "logcubic" | "log-cubic-natural" => Ok(InterpolationPolicy::LogCubicNatural),
            other => Err(Error::InvalidArgument(format!(
                "unknown interpolation policy '{other}' (expected log-linear or log-cubic)"
            ))),
        }
    }
}

/// A yield curve defined by discount factors at known dates.
#[derive(Debug)]
pub struct InterpolatedDiscountCurve {
    day_counter: Arc<dyn DayCounter>,
    policy: InterpolationPolicy,
    dates: Vec<Date>,
    times: Vec<Real>,
    discounts: Vec<DiscountFactor>,
    interp: Box<dyn Interpolation1D>,
}

impl InterpolatedDiscountCurve {
    /// Build a curve from pillar dates and discount factors.
    ///
    /// The first date is the reference date and must carry a discount of
    /// 1.0; dates must be strictly increasing and discounts positive.
    pub fn new(
        dates: &[Date],
        discounts: &[DiscountFactor],
        day_counter: Arc<dyn DayCounter>,
        policy: InterpolationPolicy,
    ) -> Result<Self> {
        ensure!(
            dates.len() >= 2,
            "need at least 2 dates (reference + 1 pillar), got {}",
            dates.len()
        );
        ensure!(
            dates.len() == discounts.len(),
            "dates and discounts must have the same length ({} vs {})",
            dates.len(),
            discounts.len()
        );
        ensure!(
            (discounts[0] - 1.0).abs() < 1e-12,
            "first discount factor must be 1.0, got {}",
            discounts[0]
        );
        if let Some(w) = dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(Error::Precondition(format!(
                "curve dates must be strictly increasing ({} then {})",
                w[0], w[1]
            )));
        }
        ensure!(
            discounts.iter().all(|d| d.is_finite() && *d > 0.0),
            "discount factors must be finite and positive"
        );

        let reference_date = dates[0];
        let times: Vec<Real> = dates
            .iter()
            .map(|&d| day_counter.year_fraction(reference_date, d))
            .collect();
        let interp = policy.build(&times, discounts)?;

        Ok(Self {
            day_counter,
            policy,
            dates: dates.to_vec(),
            times,
            discounts: discounts.to_vec(),
            interp,
        })
    }

    /// Return the pillar dates.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Return the pillar times.
    pub fn times(&self) -> &[Real] {
        &self.times
    }

    /// Return the pillar discount factors.
    pub fn discounts(&self) -> &[DiscountFactor] {
        &self.discounts
    }

    /// `(date, discount)` pairs.
    pub fn nodes(&self) -> impl Iterator<Item = (Date, DiscountFactor)> + '_ {
        self.dates.iter().copied().zip(self.discounts.iter().copied())
    }

    /// Interpolation scheme.
    pub fn policy(&self) -> InterpolationPolicy {
        self.policy
    }
}

impl TermStructure for InterpolatedDiscountCurve {
    fn reference_date(&self) -> Date {
        self.dates[0]
    }

    fn day_counter(&self) -> &dyn DayCounter {
        &*self.day_counter
    }

    fn max_date(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }
}

impl YieldTermStructure for InterpolatedDiscountCurve {
    fn discount_impl(&self, t: Time) -> DiscountFactor {
        if t == 0.0 {
            return 1.0;
        }
        self.interp.value(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_time::{Actual365Fixed, ActualActualIsda};

    fn sample_dates_discounts() -> (Vec<Date>, Vec<DiscountFactor>) {
        // 5% flat continuous rate → P(t) = exp(-0.05 * t)
        let ref_date = Date::from_ymd(2025, 1, 2).unwrap();
        let dates = vec![
            ref_date,
            Date::from_ymd(2025, 7, 2).unwrap(),
            Date::from_ymd(2026, 1, 2).unwrap(),
            Date::from_ymd(2027, 1, 2).unwrap(),
            Date::from_ymd(2030, 1, 2).unwrap(),
        ];
        let dc = Actual365Fixed;
        let discounts: Vec<DiscountFactor> = dates
            .iter()
            .map(|&d| {
                let t = dc.year_fraction(ref_date, d);
                (-0.05 * t).exp()
            })
            .collect();
        (dates, discounts)
    }

    fn curve(policy: InterpolationPolicy) -> InterpolatedDiscountCurve {
        let (dates, discounts) = sample_dates_discounts();
        InterpolatedDiscountCurve::new(&dates, &discounts, Arc::new(Actual365Fixed), policy).unwrap()
    }

    #[test]
    fn discount_curve_at_pillars() {
        let (dates, discounts) = sample_dates_discounts();
        for policy in [InterpolationPolicy::LogLinear, InterpolationPolicy::LogCubicNatural] {
            let c = curve(policy);
            assert_abs_diff_eq!(c.discount(0.0), 1.0, epsilon = 1e-15);
            for (&d, &df) in dates.iter().zip(&discounts) {
                assert_abs_diff_eq!(c.discount_date(d), df, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn log_linear_implies_flat_rate() {
        let c = curve(InterpolationPolicy::LogLinear);
        let d = Date::from_ymd(2026, 8, 17).unwrap();
        assert_abs_diff_eq!(c.zero_rate(d), 0.05, epsilon = 1e-12);
        // extrapolation continues the last forward
        let far = Date::from_ymd(2035, 1, 2).unwrap();
        assert_abs_diff_eq!(c.zero_rate(far), 0.05, epsilon = 1e-12);
        assert!(!c.check_range_date(far));
    }

    #[test]
    fn log_cubic_reproduces_exponential() {
        // ln P is linear in t, so the natural spline is exact
        let c = curve(InterpolationPolicy::LogCubicNatural);
        let t = 3.7;
        assert_abs_diff_eq!(c.discount(t), (-0.05 * t).exp(), epsilon = 1e-12);
    }

    #[test]
    fn rejects_invalid_nodes() {
        let (dates, mut discounts) = sample_dates_discounts();
        discounts[0] = 0.99;
        let dc: Arc<dyn DayCounter> = Arc::new(ActualActualIsda);
        assert!(InterpolatedDiscountCurve::new(&dates, &discounts, dc.clone(), InterpolationPolicy::LogLinear).is_err());
        let (mut dates, discounts) = sample_dates_discounts();
        dates.swap(1, 2);
        assert!(InterpolatedDiscountCurve::new(&dates, &discounts, dc.clone(), InterpolationPolicy::LogLinear).is_err());
        let (dates, mut discounts) = sample_dates_discounts();
        discounts[3] = -0.1;
        assert!(InterpolatedDiscountCurve::new(&dates, &discounts, dc, InterpolationPolicy::LogLinear).is_err());
    }

    #[test]
    fn policy_names_round_trip() {
        for policy in [InterpolationPolicy::LogLinear, InterpolationPolicy::LogCubicNatural] {
            assert_eq!(policy.to_string().parse::<InterpolationPolicy>().unwrap(), policy);
        }
        assert!("cubic".parse::<InterpolationPolicy>().is_err());
        assert!(InterpolationPolicy::LogLinear.is_local());
        assert!(!InterpolationPolicy::LogCubicNatural.is_local());
    }
}
