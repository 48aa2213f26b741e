//! `CashFlow` trait — the base for all cash-flow types.
//!
//! A cash flow is an amount of money paid at a specific date. Floating
//! amounts depend on the market, so amounts are computed against a
//! [`FixingContext`].

use crate::coupon::Coupon;
use ql_core::{errors::Result, Real};
use ql_termstructures::YieldTermStructure;
use ql_time::Date;
use std::fmt;
use std::sync::Arc;

/// Market state needed to determine a floating coupon's rate.
#[derive(Clone, Copy)]
pub struct FixingContext<'a> {
    /// Curve that projects future index fixings.
    pub forecast: &'a dyn YieldTermStructure,
    /// Date fixings are seen from: earlier fixings are historical.
    pub evaluation_date: Date,
}

impl<'a> FixingContext<'a> {
    /// Bundle a forecast curve and an evaluation date.
    pub fn new(forecast: &'a dyn YieldTermStructure, evaluation_date: Date) -> Self {
        Self {
            forecast,
            evaluation_date,
        }
    }
}

impl fmt::Debug for FixingContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixingContext")
            .field("evaluation_date", &self.evaluation_date)
            .finish_non_exhaustive()
    }
}

/// Base trait for all cash flows.
pub trait CashFlow: fmt::Debug + Send + Sync {
    /// The date on which this cash flow is paid.
    fn date(&self) -> Date;

    /// The amount paid on the payment date.
    fn amount(&self, ctx: &FixingContext<'_>) -> Result<Real>;

    /// Whether this cash flow no longer contributes as of `ref_date`.
    ///
    /// A flow paying on `ref_date` itself counts as occurred.
    fn has_occurred(&self, ref_date: Date) -> bool {
        self.date() <= ref_date
    }
}

/// A sequence of coupons.
pub type Leg = Vec<Arc<dyn Coupon>>;
