//! # ql-termstructures
//!
//! Yield term structures: the `YieldTermStructure` trait, the flat and
//! interpolated discount curves, and `CurveRegistry`, the relinkable curve
//! reference that pricers resolve at valuation time.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `TermStructure` — base trait for all term structures.
pub mod term_structure;

/// `YieldTermStructure` — discount factors, zero and forward rates.
pub mod yield_term_structure;

/// `FlatForward` — constant forward-rate yield curve.
pub mod flat_forward;

/// `InterpolatedDiscountCurve` — discount-factor interpolated yield curve.
pub mod interpolated_discount_curve;

/// `CurveRegistry` — named relinkable reference to the active curve.
pub mod curve_registry;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use curve_registry::CurveRegistry;
pub use flat_forward::FlatForward;
pub use interpolated_discount_curve::{InterpolatedDiscountCurve, InterpolationPolicy};
pub use term_structure::TermStructure;
pub use yield_term_structure::YieldTermStructure;
