//! # ql-indexes
//!
//! Interest-rate index definitions and their historical fixings.
//!
//! An `IborIndex` or `OvernightIndex` knows its own conventions (tenor,
//! fixing days, calendar, day counter). It does not hold a curve: the
//! forecasting curve is passed in when a fixing has to be projected.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `Index` trait and `FixingStore`.
pub mod index;

/// `IborIndex` — interbank offered-rate indexes.
pub mod ibor_index;

/// Concrete IBOR index definitions (Euribor, GBP LIBOR).
pub mod ibor;

/// `OvernightIndex` — overnight rate indexes.
pub mod overnight_index;

/// Concrete overnight index definitions (SONIA).
pub mod overnight;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use ibor::{euribor, euribor_months, gbp_libor};
pub use ibor_index::IborIndex;
pub use index::{FixingStore, Index};
pub use overnight::sonia;
pub use overnight_index::OvernightIndex;
