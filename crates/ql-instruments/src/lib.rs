//! # ql-instruments
//!
//! Fixed-for-floating interest-rate swaps and the `MakeVanillaSwap`
//! builder used both for traded swaps and for par-swap calibration.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// `SwapType` and `VanillaSwap`.
pub mod swap;

/// `MakeVanillaSwap` — builds a swap from a tenor and an index.
pub mod make_vanilla_swap;

pub use make_vanilla_swap::MakeVanillaSwap;
pub use swap::{SwapType, VanillaSwap};
