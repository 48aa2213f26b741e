//! `CurveRegistry` — a named, relinkable reference to the curve currently in
//! use for discounting or forecasting.
//!
//! Pricers hold a registry rather than a curve. Rebuilding the market only
//! requires linking the new curve; every clone of the registry sees it on its
//! next [`resolve`](CurveRegistry::resolve).

use crate::yield_term_structure::YieldTermStructure;
use ql_core::{
    errors::{Error, Result},
    RelinkableHandle,
};
use std::sync::Arc;

/// A relinkable reference to a yield curve.
#[derive(Debug, Clone)]
pub struct CurveRegistry {
    name: Arc<str>,
    handle: RelinkableHandle<dyn YieldTermStructure>,
}

impl CurveRegistry {
    /// An unlinked registry.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            handle: RelinkableHandle::null(),
        }
    }

    /// A registry already linked to `curve`.
    pub fn linked(name: impl Into<Arc<str>>, curve: Arc<dyn YieldTermStructure>) -> Self {
        Self {
            name: name.into(),
            handle: RelinkableHandle::linked(curve),
        }
    }

    /// Name used in diagnostics (e.g. `"discounting"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Repoint the registry at `curve`.
    pub fn link_to(&self, curve: Arc<dyn YieldTermStructure>) {
        self.handle.link_to(curve);
    }

    /// Detach the registry from its curve.
    pub fn unlink(&self) {
        self.handle.unlink();
    }

    /// Return `true` if a curve is linked.
    pub fn is_linked(&self) -> bool {
        !self.handle.is_empty()
    }

    /// Snapshot of the linked curve.
    ///
    /// # Errors
    /// [`Error::UnlinkedReference`] if nothing was linked.
    pub fn resolve(&self) -> Result<Arc<dyn YieldTermStructure>> {
        self.handle
            .current()
            .ok_or_else(|| Error::UnlinkedReference(self.name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flat_forward::FlatForward;
    use approx::assert_abs_diff_eq;
    use ql_time::{Actual365Fixed, Date};

    fn flat(rate: f64) -> Arc<dyn YieldTermStructure> {
        Arc::new(FlatForward::new(
            Date::from_ymd(2016, 10, 4).unwrap(),
            rate,
            Actual365Fixed,
        ))
    }

    #[test]
    fn unlinked_registry_fails_to_resolve() {
        let reg = CurveRegistry::new("discounting");
        assert!(!reg.is_linked());
        assert_eq!(
            reg.resolve().unwrap_err(),
            Error::UnlinkedReference("discounting".into())
        );
    }

    #[test]
    fn relink_is_seen_by_clones() {
        let reg = CurveRegistry::new("forecasting");
        let view = reg.clone();
        reg.link_to(flat(0.01));
        reg.link_to(flat(0.02));
        let curve = view.resolve().unwrap();
        assert_abs_diff_eq!(curve.discount(1.0), (-0.02f64).exp(), epsilon = 1e-15);
        view.unlink();
        assert!(reg.resolve().is_err());
    }

    #[test]
    fn registries_can_share_a_curve() {
        let curve = flat(0.03);
        let disc = CurveRegistry::linked("discounting", Arc::clone(&curve));
        let fwd = CurveRegistry::linked("forecasting", Arc::clone(&curve));
        assert!(Arc::ptr_eq(&disc.resolve().unwrap(), &fwd.resolve().unwrap()));
        assert_eq!(fwd.name(), "forecasting");
    }

    #[test]
    fn snapshot_outlives_relink() {
        let reg = CurveRegistry::linked("discounting", flat(0.01));
        let before = reg.resolve().unwrap();
        reg.link_to(flat(0.05));
        assert_abs_diff_eq!(before.discount(1.0), (-0.01f64).exp(), epsilon = 1e-15);
    }
}
