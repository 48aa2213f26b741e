//! Repricing check of calibrating swaps.
//!
//! A swap the curve was calibrated to must come back at its own quote when
//! priced as a standalone instrument on that curve.

use crate::instrument::CalibratingInstrument;
use ql_core::{
    errors::{Error, Result},
    Real,
};
use ql_pricingengines::{SwapValuator, ValuationResult};
use ql_termstructures::CurveRegistry;
use ql_time::Date;
use tracing::debug;

/// Default tolerance on `|fair rate - quote|`.
pub const DEFAULT_TOLERANCE: Real = 1.0e-8;

/// Verifies that calibrating swaps reprice to their quotes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsistencyChecker {
    tolerance: Real,
}

impl Default for ConsistencyChecker {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl ConsistencyChecker {
    /// Create a checker with the given tolerance.
    pub fn new(tolerance: Real) -> Self {
        Self { tolerance }
    }

    /// Tolerance on `|fair rate - quote|`.
    pub fn tolerance(&self) -> Real {
        self.tolerance
    }

    /// Check `result` (the valuation of `instrument` as a standalone swap)
    /// against the instrument's quote.
    ///
    /// # Errors
    /// [`Error::RepricingMismatch`] if the fair rate is off by the tolerance
    /// or more, [`Error::InvalidArgument`] if `instrument` is not a swap.
    pub fn verify(&self, instrument: &CalibratingInstrument, result: &ValuationResult) -> Result<()> {
        if !instrument.is_swap() {
            return Err(Error::InvalidArgument(format!(
                "{} is not a swap; only swaps are repriced",
                instrument.label()
            )));
        }
        let quoted = instrument.quote()?;
        let fair = result.fair_rate;
        debug!(
            instrument = instrument.label(),
            fair,
            quoted,
            "repricing check"
        );
        if (fair - quoted).abs() < self.tolerance {
            Ok(())
        } else {
            Err(Error::RepricingMismatch {
                instrument: instrument.label().to_string(),
                fair,
                quoted,
            })
        }
    }

    /// Price `instrument` standalone against the registries and verify it.
    pub fn reprice(
        &self,
        instrument: &CalibratingInstrument,
        discount: &CurveRegistry,
        forecast: &CurveRegistry,
        evaluation_date: Date,
    ) -> Result<ValuationResult> {
        let swap = instrument.standalone_swap()?;
        let result = SwapValuator::new().price(&swap, discount, forecast, evaluation_date)?;
        self.verify(instrument, &result)?;
        Ok(result)
    }
}

/// [`ConsistencyChecker::verify`] with an explicit tolerance.
pub fn verify(instrument: &CalibratingInstrument, result: &ValuationResult, tolerance: Real) -> Result<()> {
    ConsistencyChecker::new(tolerance).verify(instrument, result)
}
