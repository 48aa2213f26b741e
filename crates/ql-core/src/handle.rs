//! `Handle<T>` and `RelinkableHandle<T>` — shared indirections to a value.
//!
//! | Type | Semantics |
//! |------|-----------|
//! | `Handle<T>` | fixed `Arc`, optionally null; clones share the target |
//! | `RelinkableHandle<T>` | `Arc<RwLock<Option<Arc<T>>>>`; relinking is visible to every clone |
//!
//! Readers of a `RelinkableHandle` take an `Arc` snapshot, so a concurrent
//! relink never exposes a half-updated target: the reader keeps the old
//! value alive until it drops the snapshot.

use std::sync::Arc;

use parking_lot::RwLock;

/// A shared, optionally-null reference to a value of type `T`.
///
/// The handle itself is read-only; targets with interior mutability (such
/// as a quote) are observed through it on every read.
pub struct Handle<T: ?Sized> {
    inner: Option<Arc<T>>,
}

impl<T: ?Sized> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Handle<T> {
    /// Create a non-null handle wrapping `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Some(Arc::new(value)),
        }
    }
}

impl<T: ?Sized> Handle<T> {
    /// Create a handle from an existing `Arc`.
    pub fn from_arc(arc: Arc<T>) -> Self {
        Self { inner: Some(arc) }
    }

    /// Create a null (empty) handle.
    pub fn null() -> Self {
        Self { inner: None }
    }

    /// Return `true` if the handle is null.
    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    /// Borrow the contained value, or `None` if the handle is null.
    pub fn get(&self) -> Option<&T> {
        self.inner.as_deref()
    }

    /// Return `true` if both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: ?Sized> Default for Handle<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: ?Sized + std::fmt::Debug> std::fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            Some(v) => write!(f, "Handle({:?})", v),
            None => write!(f, "Handle(null)"),
        }
    }
}

/// A handle whose target can be replaced at runtime.
///
/// Clones share the same cell: relinking through any clone is observed by
/// all of them on their next [`current`](Self::current) call.
pub struct RelinkableHandle<T: ?Sized> {
    inner: Arc<RwLock<Option<Arc<T>>>>,
}

impl<T: ?Sized> Clone for RelinkableHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ?Sized> RelinkableHandle<T> {
    /// Create a new relinkable handle, initially null.
    pub fn null() -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a relinkable handle already linked to `target`.
    pub fn linked(target: Arc<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(target))),
        }
    }

    /// Repoint the handle at `target`.
    pub fn link_to(&self, target: Arc<T>) {
        *self.inner.write() = Some(target);
    }

    /// Detach the handle from its target.
    pub fn unlink(&self) {
        *self.inner.write() = None;
    }

    /// Return `true` if the handle currently has no target.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_none()
    }

    /// Snapshot of the current target, or `None` if unlinked.
    pub fn current(&self) -> Option<Arc<T>> {
        self.inner.read().clone()
    }

    /// Return `true` if both handles share the same cell.
    pub fn same_cell(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: ?Sized> Default for RelinkableHandle<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: ?Sized> std::fmt::Debug for RelinkableHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "RelinkableHandle(null)")
        } else {
            write!(f, "RelinkableHandle(linked)")
        }
    }
}
