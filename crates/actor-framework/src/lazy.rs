//! # Lazy References
//!
//! Entities often need a handle to a related entity (a building's city, a tile's building).
//! Looking it up on every message is wasteful, caching it forever is wrong once the
//! relationship can change. [`LazyRef`] makes the cached state explicit: it is resolved on
//! first access and only goes back to unresolved through [`LazyRef::invalidate`].

/// A handle that is resolved on first use and cached until invalidated.
#[derive(Debug, Clone, Default)]
pub enum LazyRef<H> {
    #[default]
    Unresolved,
    Resolved(H),
}

impl<H: Clone> LazyRef<H> {
    /// Returns the cached handle, running `resolve` first if nothing is cached.
    ///
    /// A failed resolution (`None`) leaves the reference unresolved so the next access retries.
    pub fn resolve(&mut self, resolve: impl FnOnce() -> Option<H>) -> Option<H> {
        if let LazyRef::Resolved(handle) = self {
            return Some(handle.clone());
        }
        let handle = resolve()?;
        *self = LazyRef::Resolved(handle.clone());
        Some(handle)
    }

    pub fn invalidate(&mut self) {
        *self = LazyRef::Unresolved;
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, LazyRef::Resolved(_))
    }
}
