//! # ql-bootstrap
//!
//! Discount-curve calibration for the swap revaluation workspace.
//!
//! - [`RateHelper`] and the deposit, futures, FRA, OIS and swap helpers
//! - [`InstrumentSpec`] tables, [`HelperConventions`] and the
//!   [`CalibratingInstrument`]s they produce
//! - [`CurveInstrumentSet`] and the standard [`Composition`]s
//! - [`CurveBuilder`] — the sequential bootstrap
//! - [`ConsistencyChecker`] — repricing of calibrating swaps

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Rate helpers: market quotes as curve constraints.
pub mod rate_helpers;

/// Instrument tables and calibrating instruments.
pub mod instrument;

/// Ordered, validated instrument sets.
pub mod instrument_set;

/// The bootstrap.
pub mod curve_builder;

/// Repricing check.
pub mod consistency;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use consistency::ConsistencyChecker;
pub use curve_builder::{build, CurveBuilder};
pub use instrument::{CalibratingInstrument, HelperConventions, InstrumentKind, InstrumentSpec};
pub use instrument_set::{Composition, CurveInstrumentSet};
pub use rate_helpers::{
    DepositRateHelper, FraRateHelper, FuturesRateHelper, OisRateHelper, RateHelper, SwapRateHelper,
};
