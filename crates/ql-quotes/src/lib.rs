//! # ql-quotes
//!
//! Market quotes and the keyed `QuoteStore` that owns them.
//!
//! The store is the single mutation point of a revaluation run: setting a
//! quote is immediately visible through every `QuoteHandle` bound to it,
//! but nothing is recomputed until the caller rebuilds its curves.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// `Quote` trait, `SimpleQuote` and `QuoteHandle`.
pub mod quote;

/// `QuoteStore` — quotes addressable by key.
pub mod quote_store;

pub use quote::{Quote, QuoteHandle, SimpleQuote};
pub use quote_store::QuoteStore;
