//! `Index` — base trait for market indexes, and the fixing store they share.

use parking_lot::RwLock;
use ql_core::Real;
use ql_time::{Calendar, Date};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Historical fixings of one index.
///
/// Clones share the same table, so fixings added through any clone of an
/// index are visible to all of them.
#[derive(Debug, Clone, Default)]
pub struct FixingStore {
    data: Arc<RwLock<BTreeMap<Date, Real>>>,
}

impl FixingStore {
    /// Create a new, empty fixing store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or overwrite) a fixing.
    pub fn add(&self, date: Date, value: Real) {
        self.data.write().insert(date, value);
    }

    /// Look up a fixing.
    pub fn get(&self, date: Date) -> Option<Real> {
        self.data.read().get(&date).copied()
    }

    /// Number of stored fixings.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Clear all fixings.
    pub fn clear(&self) {
        self.data.write().clear();
    }
}

/// Base trait for market indexes.
pub trait Index: std::fmt::Debug + Send + Sync {
    /// Unique name (e.g. `"Euribor6M"`).
    fn name(&self) -> &str;

    /// Calendar used by this index.
    fn fixing_calendar(&self) -> &dyn Calendar;

    /// Whether `date` is a valid fixing date.
    fn is_valid_fixing_date(&self, date: Date) -> bool {
        self.fixing_calendar().is_business_day(date)
    }

    /// Reference to the historic-fixing store.
    fn fixing_store(&self) -> &FixingStore;

    /// Record a historical fixing.
    fn add_fixing(&self, date: Date, value: Real) {
        self.fixing_store().add(date, value);
    }

    /// The recorded fixing for `date`, if any.
    fn past_fixing(&self, date: Date) -> Option<Real> {
        self.fixing_store().get(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_is_shared_between_clones() {
        let store = FixingStore::new();
        let other = store.clone();
        let d = Date::from_ymd(2016, 9, 30).unwrap();
        store.add(d, -0.00201);
        assert_eq!(other.get(d), Some(-0.00201));
        assert_eq!(other.len(), 1);
        other.clear();
        assert!(store.is_empty());
    }
}
