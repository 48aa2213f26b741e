//! # ql-core
//!
//! Core types and error definitions shared by every crate of the swap
//! revaluation workspace.
//!
//! This crate provides the foundational building blocks: numeric type
//! aliases, the error taxonomy surfaced by the curve-building and pricing
//! workflow, and the `Handle` / `RelinkableHandle` indirections used to
//! repoint curves without reconstructing their consumers.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` / `fail!` macros.
pub mod errors;

/// Shared reference handles (`Handle<T>`, `RelinkableHandle<T>`).
pub mod handle;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Non-negative integer type.
pub type Natural = u32;

/// Alias used for array sizes / indices.
pub type Size = usize;

/// A rate expressed as a decimal (e.g. 0.05 = 5 %).
pub type Rate = Real;

/// A spread over a reference rate.
pub type Spread = Real;

/// A discount factor, normally in (0, 1].
pub type DiscountFactor = Real;

/// A time measurement in years.
pub type Time = Real;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
pub use handle::{Handle, RelinkableHandle};
