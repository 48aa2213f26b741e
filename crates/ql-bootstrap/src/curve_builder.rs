//! `CurveBuilder` — bootstraps a discount curve from a calibrating
//! instrument set.
//!
//! Node 0 is the evaluation date with a discount factor of 1. Every
//! instrument adds one node at its pillar; going through the instruments in
//! pillar order, Brent's method finds the discount factor at the new node
//! for which the instrument's implied quote equals its market quote on the
//! curve built so far.
//!
//! The initial bracket comes from bounding the continuously-compounded
//! forward between the previous node and the pillar,
//!
//! $$P_k \in \left[P_{k-1} e^{-f_{\max}\Delta t},\; P_{k-1} e^{-f_{\min}\Delta t}\right],$$
//!
//! and is widened geometrically when the quote lies outside it.
//!
//! A log-linear curve is exact after one pass: an instrument only depends on
//! nodes up to its own pillar. A log-cubic spline is global, so the whole
//! set is re-solved against the latest curve until no node moves by more
//! than the sweep tolerance.

use crate::instrument::CalibratingInstrument;
use crate::instrument_set::CurveInstrumentSet;
use ql_core::{
    ensure,
    errors::{Error, Result},
    DiscountFactor, Rate, Real,
};
use ql_math::{brent, expand_bracket, SolverSettings};
use ql_termstructures::{InterpolatedDiscountCurve, InterpolationPolicy};
use ql_time::{ActualActualIsda, Date, DayCounter};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default accuracy on node discount factors.
pub const DEFAULT_ACCURACY: Real = 1.0e-12;

/// Maximum objective evaluations per node solve.
pub const MAX_ITERATIONS: usize = 100;

/// Default bound on full sweeps for global interpolation.
pub const DEFAULT_MAX_PASSES: usize = 100;

const MIN_FORWARD: Rate = -0.10;
const MAX_FORWARD: Rate = 0.30;
const MIN_FORWARD_LIMIT: Rate = -1.0;
const MAX_FORWARD_LIMIT: Rate = 5.0;
const MAX_BRACKET_EXPANSIONS: usize = 20;
const MIN_SWEEP_TOLERANCE: Real = 1.0e-12;

/// Bootstrap settings.
#[derive(Debug, Clone)]
pub struct CurveBuilder {
    /// Day counter converting curve dates to times.
    pub day_counter: Arc<dyn DayCounter>,
    /// Interpolation on discount factors.
    pub policy: InterpolationPolicy,
    /// Absolute accuracy of each node solve.
    pub accuracy: Real,
    /// Iteration limit of each node solve.
    pub max_iterations: usize,
    /// Sweep limit for non-local interpolation.
    pub max_passes: usize,
}

impl Default for CurveBuilder {
    fn default() -> Self {
        Self::new(Arc::new(ActualActualIsda), InterpolationPolicy::LogLinear)
    }
}

impl CurveBuilder {
    /// Create a builder with default accuracy and limits.
    pub fn new(day_counter: Arc<dyn DayCounter>, policy: InterpolationPolicy) -> Self {
        Self {
            day_counter,
            policy,
            accuracy: DEFAULT_ACCURACY,
            max_iterations: MAX_ITERATIONS,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    /// Set the node accuracy.
    pub fn with_accuracy(mut self, accuracy: Real) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Set the per-node iteration limit.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Set the sweep limit.
    pub fn with_max_passes(mut self, n: usize) -> Self {
        self.max_passes = n;
        self
    }

    /// Bootstrap a fresh curve from `instruments` as of `evaluation_date`.
    ///
    /// # Errors
    /// [`Error::BootstrapFailure`] naming the instrument whose node could
    /// not be solved; [`Error::InvalidInstrumentSet`] if a pillar is not
    /// after the evaluation date; quote errors propagate unchanged.
    pub fn build(
        &self,
        evaluation_date: Date,
        instruments: &CurveInstrumentSet,
    ) -> Result<Arc<InterpolatedDiscountCurve>> {
        ensure!(self.accuracy > 0.0, "accuracy must be positive, got {}", self.accuracy);
        let n = instruments.len();
        let mut dates = Vec::with_capacity(n + 1);
        dates.push(evaluation_date);
        for instrument in instruments {
            if instrument.pillar_date() <= evaluation_date {
                return Err(Error::InvalidInstrumentSet(format!(
                    "{}: {} has pillar {} on or before the evaluation date {evaluation_date}",
                    instruments.name(),
                    instrument.label(),
                    instrument.pillar_date()
                )));
            }
            dates.push(instrument.pillar_date());
        }
        let mut discounts: Vec<DiscountFactor> = vec![1.0; n + 1];

        for (k, instrument) in (1..=n).zip(instruments) {
            discounts[k] = discounts[k - 1];
            self.solve_node(evaluation_date, &dates[..=k], &mut discounts[..=k], k, instrument)?;
        }

        if !self.policy.is_local() {
            self.sweep(evaluation_date, &dates, &mut discounts, instruments)?;
        }

        let curve = InterpolatedDiscountCurve::new(
            &dates,
            &discounts,
            Arc::clone(&self.day_counter),
            self.policy,
        )?;
        info!(
            set = instruments.name(),
            nodes = dates.len(),
            policy = %self.policy,
            max_date = %dates[n],
            "curve built"
        );
        Ok(Arc::new(curve))
    }

    /// Re-solve every node against the latest curve until it settles.
    fn sweep(
        &self,
        evaluation_date: Date,
        dates: &[Date],
        discounts: &mut [DiscountFactor],
        instruments: &CurveInstrumentSet,
    ) -> Result<()> {
        let tolerance = self.accuracy.max(MIN_SWEEP_TOLERANCE);
        let mut worst = (0.0, "");
        for pass in 1..=self.max_passes {
            worst = (0.0, "");
            for (k, instrument) in (1..dates.len()).zip(instruments) {
                let before = discounts[k];
                let after = self.solve_node(evaluation_date, dates, discounts, k, instrument)?;
                let change = (after - before).abs();
                if change > worst.0 {
                    worst = (change, instrument.label());
                }
            }
            debug!(pass, max_change = worst.0, "bootstrap sweep");
            if worst.0 < tolerance {
                if pass > self.max_passes / 2 {
                    warn!(
                        set = instruments.name(),
                        pass,
                        max_passes = self.max_passes,
                        "bootstrap converged slowly"
                    );
                }
                return Ok(());
            }
        }
        Err(Error::BootstrapFailure {
            instrument: worst.1.to_string(),
            reason: format!(
                "no convergence after {} sweeps (last change {:.3e})",
                self.max_passes, worst.0
            ),
        })
    }

    /// Solve the discount factor of node `k` and store it in `discounts[k]`.
    fn solve_node(
        &self,
        evaluation_date: Date,
        dates: &[Date],
        discounts: &mut [DiscountFactor],
        k: usize,
        instrument: &CalibratingInstrument,
    ) -> Result<DiscountFactor> {
        let quote = instrument.quote()?;
        let helper = instrument.helper();
        let previous = discounts[k - 1];
        let dt = self.day_counter.year_fraction(dates[k - 1], dates[k]);
        let bound = |forward: Rate| previous * (-forward * dt).exp();

        let policy = self.policy;
        let day_counter = &self.day_counter;
        let mut objective = |df: DiscountFactor| -> Result<Real> {
            discounts[k] = df;
            let trial =
                InterpolatedDiscountCurve::new(dates, &*discounts, Arc::clone(day_counter), policy)?;
            Ok(helper.implied_quote(&trial, evaluation_date)? - quote)
        };

        let solved = expand_bracket(
            &mut objective,
            bound(MAX_FORWARD),
            bound(MIN_FORWARD),
            bound(MAX_FORWARD_LIMIT),
            bound(MIN_FORWARD_LIMIT),
            MAX_BRACKET_EXPANSIONS,
        )
        .and_then(|(lo, hi)| {
            brent(
                &mut objective,
                lo,
                hi,
                SolverSettings {
                    accuracy: self.accuracy,
                    max_iterations: self.max_iterations,
                },
            )
        })
        .map_err(|e| match e {
            Error::Runtime(reason) | Error::Precondition(reason) => Error::BootstrapFailure {
                instrument: instrument.label().to_string(),
                reason,
            },
            other => other,
        })?;

        discounts[k] = solved;
        debug!(
            instrument = instrument.label(),
            pillar = %dates[k],
            discount = solved,
            "node solved"
        );
        Ok(solved)
    }
}

/// Bootstrap a curve with the given day counter, interpolation and node
/// accuracy. See [`CurveBuilder::build`].
pub fn build(
    evaluation_date: Date,
    instruments: &CurveInstrumentSet,
    day_counter: Arc<dyn DayCounter>,
    policy: InterpolationPolicy,
    tolerance: Real,
) -> Result<Arc<InterpolatedDiscountCurve>> {
    CurveBuilder::new(day_counter, policy)
        .with_accuracy(tolerance)
        .build(evaluation_date, instruments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::{HelperConventions, InstrumentSpec};
    use approx::assert_abs_diff_eq;
    use ql_quotes::QuoteStore;
    use ql_termstructures::YieldTermStructure;
    use ql_time::Period;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn today() -> Date {
        date(2016, 10, 4)
    }

    fn deposits(quotes: &QuoteStore) -> CurveInstrumentSet {
        let specs = [
            InstrumentSpec::deposit(Period::months(1), "D1M"),
            InstrumentSpec::deposit(Period::months(3), "D3M"),
        ];
        CurveInstrumentSet::from_specs("deposits", today(), &specs, &HelperConventions::sterling(), quotes)
            .unwrap()
    }

    #[test]
    fn deposit_curve_is_exact() {
        let quotes = QuoteStore::from_pairs([("D1M", 0.0025), ("D3M", 0.0038)]);
        let set = deposits(&quotes);
        let curve = CurveBuilder::default().with_accuracy(1e-15).build(today(), &set).unwrap();
        assert_eq!(curve.dates().len(), 3);
        assert_eq!(curve.discounts()[0], 1.0);
        // D1M: 4 Oct to 4 Nov 2016, 31 days Act/365F
        let tau = 31.0 / 365.0;
        assert_abs_diff_eq!(curve.discounts()[1], 1.0 / (1.0 + 0.0025 * tau), epsilon = 1e-14);
        for instrument in &set {
            let err = instrument.helper().quote_error(&*curve, today()).unwrap();
            assert_abs_diff_eq!(err, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn rebuild_is_idempotent_and_fresh() {
        let quotes = QuoteStore::from_pairs([("D1M", 0.0025), ("D3M", 0.0038)]);
        let set = deposits(&quotes);
        let builder = CurveBuilder::default();
        let a = builder.build(today(), &set).unwrap();
        let b = builder.build(today(), &set).unwrap();
        assert_eq!(a.discounts(), b.discounts());
        assert!(!Arc::ptr_eq(&a, &b));

        quotes.set("D3M", 0.0050).unwrap();
        let c = builder.build(today(), &set).unwrap();
        assert_eq!(a.discounts()[1], c.discounts()[1]);
        assert!(c.discounts()[2] < a.discounts()[2]);
    }

    #[test]
    fn log_cubic_sweeps_converge() {
        let quotes = QuoteStore::from_pairs([("D1M", 0.0025), ("D2M", 0.0030), ("D3M", 0.0038)]);
        let specs = [
            InstrumentSpec::deposit(Period::months(1), "D1M"),
            InstrumentSpec::deposit(Period::months(2), "D2M"),
            InstrumentSpec::deposit(Period::months(3), "D3M"),
        ];
        let set =
            CurveInstrumentSet::from_specs("deposits", today(), &specs, &HelperConventions::sterling(), &quotes)
                .unwrap();
        let curve = CurveBuilder::new(Arc::new(ActualActualIsda), InterpolationPolicy::LogCubicNatural)
            .build(today(), &set)
            .unwrap();
        assert_eq!(curve.policy(), InterpolationPolicy::LogCubicNatural);
        for instrument in &set {
            let err = instrument.helper().quote_error(&*curve, today()).unwrap();
            assert_abs_diff_eq!(err, 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn unreachable_quote_names_the_instrument() {
        let quotes = QuoteStore::from_pairs([("D1M", 0.0025), ("D3M", 1.0e6)]);
        let set = deposits(&quotes);
        let err = CurveBuilder::default().build(today(), &set).unwrap_err();
        match err {
            Error::BootstrapFailure { instrument, .. } => assert_eq!(instrument, "3M deposit (D3M)"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn free_function_matches_builder() {
        let quotes = QuoteStore::from_pairs([("D1M", 0.0025), ("D3M", 0.0038)]);
        let set = deposits(&quotes);
        let curve = build(today(), &set, Arc::new(ActualActualIsda), InterpolationPolicy::LogLinear, 1e-15)
            .unwrap();
        let same = CurveBuilder::default().with_accuracy(1e-15).build(today(), &set).unwrap();
        assert_eq!(curve.discounts(), same.discounts());
        assert!(curve.discount_date(date(2017, 1, 4)) < 1.0);
    }

    #[test]
    fn pillar_on_evaluation_date_is_rejected() {
        let quotes = QuoteStore::from_pairs([("D1M", 0.0025), ("D3M", 0.0038)]);
        let set = deposits(&quotes);
        let err = CurveBuilder::default().build(date(2016, 11, 4), &set).unwrap_err();
        assert!(matches!(err, Error::InvalidInstrumentSet(_)));
    }
}
