//! # ql-pricingengines
//!
//! Discounting valuation of vanilla swaps.
//!
//! - [`SwapValuator`] — prices a [`VanillaSwap`](ql_instruments::VanillaSwap)
//!   against a discounting and a forecasting curve, either resolved from
//!   [`CurveRegistry`](ql_termstructures::CurveRegistry) references or
//!   passed directly.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// `SwapValuator` and `ValuationResult`.
pub mod swap_valuator;

pub use swap_valuator::{SwapValuator, ValuationResult};
