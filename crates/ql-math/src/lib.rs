//! # ql-math
//!
//! Mathematical utilities used by curve bootstrapping: 1D interpolation
//! (linear, natural cubic spline, and their log-space variants) and a
//! bracketing Brent root finder.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// 1D interpolation schemes.
pub mod interpolations;

/// 1D root-finding solvers.
pub mod solvers1d;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use interpolations::{
    CubicNaturalSpline, Interpolation1D, LinearInterpolation, LogInterpolation,
};
pub use solvers1d::{brent, expand_bracket, SolverSettings};
