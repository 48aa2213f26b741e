//! `QuoteStore` — the keyed owner of every market quote in a run.
//!
//! Quotes are created once and never removed. A key always maps to the same
//! `Arc<SimpleQuote>`, so handles taken before a [`QuoteStore::set`] observe
//! the new value on their next read.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use ql_core::{
    errors::{Error, Result},
    Real,
};
use tracing::debug;

use crate::quote::{Quote, QuoteHandle, SimpleQuote};

/// Market quotes addressed by stable string keys (`"S5Y"`, `"FUT1"`, ...).
#[derive(Debug, Default)]
pub struct QuoteStore {
    quotes: RwLock<BTreeMap<String, Arc<SimpleQuote>>>,
}

impl QuoteStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(key, value)` pairs; later pairs overwrite
    /// earlier ones with the same key.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Real)>,
        K: Into<String>,
    {
        let store = Self::new();
        for (key, value) in pairs {
            store.insert(key, value);
        }
        store
    }

    /// Create the quote for `key`, or overwrite its value if it exists.
    pub fn insert(&self, key: impl Into<String>, value: Real) -> QuoteHandle {
        let key = key.into();
        let mut quotes = self.quotes.write();
        let quote = quotes
            .entry(key.clone())
            .or_insert_with(|| Arc::new(SimpleQuote::empty()));
        quote.set_value(value);
        QuoteHandle::new(key, Arc::clone(quote))
    }

    /// Update an existing quote.
    ///
    /// # Errors
    /// [`Error::KeyNotFound`] if `key` was never inserted.
    pub fn set(&self, key: &str, value: Real) -> Result<()> {
        let quotes = self.quotes.read();
        let quote = quotes
            .get(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))?;
        let previous = quote.set_value(value);
        debug!(key, ?previous, value, "quote updated");
        Ok(())
    }

    /// Current value of `key`.
    ///
    /// # Errors
    /// [`Error::KeyNotFound`] for an unknown key, [`Error::NullValue`] if
    /// the quote is unset.
    pub fn get(&self, key: &str) -> Result<Real> {
        let quotes = self.quotes.read();
        let quote = quotes
            .get(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))?;
        quote
            .value()
            .ok_or_else(|| Error::NullValue(format!("quote {key} has no value")))
    }

    /// A handle bound to the quote stored under `key`.
    pub fn handle(&self, key: &str) -> Result<QuoteHandle> {
        self.quotes
            .read()
            .get(key)
            .map(|q| QuoteHandle::new(key, Arc::clone(q)))
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    /// Return `true` if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.quotes.read().contains_key(key)
    }

    /// All keys, in order.
    pub fn keys(&self) -> Vec<String> {
        self.quotes.read().keys().cloned().collect()
    }

    /// Number of quotes.
    pub fn len(&self) -> usize {
        self.quotes.read().len()
    }

    /// Return `true` if the store holds no quote.
    pub fn is_empty(&self) -> bool {
        self.quotes.read().is_empty()
    }
}
