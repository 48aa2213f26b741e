//! `Quote` trait, `SimpleQuote`, and the `QuoteHandle` indirection.

use std::sync::Arc;

use parking_lot::RwLock;
use ql_core::{
    errors::{Error, Result},
    Handle, Real,
};

/// A market-observable value.
pub trait Quote: std::fmt::Debug + Send + Sync {
    /// The current value, or `None` if the quote is unset.
    fn value(&self) -> Option<Real>;

    /// Return `true` if the quote currently holds a value.
    fn is_valid(&self) -> bool {
        self.value().is_some()
    }
}

/// A settable market quote.
///
/// The value lives behind a lock so that a quote shared through several
/// handles can be updated in place; every holder sees the new value on its
/// next read.
#[derive(Debug, Default)]
pub struct SimpleQuote {
    value: RwLock<Option<Real>>,
}

impl SimpleQuote {
    /// Create a quote holding `value`.
    pub fn new(value: Real) -> Self {
        Self {
            value: RwLock::new(Some(value)),
        }
    }

    /// Create an unset quote.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set a new value, returning the previous one.
    pub fn set_value(&self, value: Real) -> Option<Real> {
        self.value.write().replace(value)
    }

    /// Clear the value.
    pub fn reset(&self) {
        *self.value.write() = None;
    }
}

impl Quote for SimpleQuote {
    fn value(&self) -> Option<Real> {
        *self.value.read()
    }
}

/// A keyed handle to a quote owned by a [`QuoteStore`](crate::QuoteStore).
///
/// Cloning the handle shares the quote; the key is kept for diagnostics.
#[derive(Debug, Clone)]
pub struct QuoteHandle {
    key: Arc<str>,
    quote: Handle<SimpleQuote>,
}

impl QuoteHandle {
    /// Bind `key` to an existing quote.
    pub fn new(key: impl Into<Arc<str>>, quote: Arc<SimpleQuote>) -> Self {
        Self {
            key: key.into(),
            quote: Handle::from_arc(quote),
        }
    }

    /// A standalone handle holding a fixed value (not owned by any store).
    pub fn detached(key: impl Into<Arc<str>>, value: Real) -> Self {
        Self {
            key: key.into(),
            quote: Handle::new(SimpleQuote::new(value)),
        }
    }

    /// Key the handle was bound to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current value of the quote.
    ///
    /// # Errors
    /// [`Error::NullValue`] if the quote is unset.
    pub fn value(&self) -> Result<Real> {
        self.quote
            .get()
            .and_then(Quote::value)
            .ok_or_else(|| Error::NullValue(format!("quote {} has no value", self.key)))
    }

    /// Return `true` if both handles share the same quote.
    pub fn same_quote(&self, other: &QuoteHandle) -> bool {
        self.quote.ptr_eq(&other.quote)
    }
}
