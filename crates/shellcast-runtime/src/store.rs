#![forbid(unsafe_code)]

//! Wait-free latest-snapshot store.
//!
//! The host writes one [`Snapshot`] per transition; renderers read it every
//! frame. Reads go through [`arc_swap::ArcSwap`], so they never block the
//! writer and never observe a half-updated snapshot.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use shellcast_core::Snapshot;

/// Latest published snapshot plus a change counter.
pub struct SnapshotStore {
    inner: ArcSwap<Snapshot>,
    version: AtomicU64,
}

impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("version", &self.version())
            .field("phase", &self.inner.load().phase)
            .finish()
    }
}

impl SnapshotStore {
    /// Store holding `initial` at version 0.
    #[must_use]
    pub fn new(initial: Snapshot) -> Self {
        Self {
            inner: ArcSwap::from_pointee(initial),
            version: AtomicU64::new(0),
        }
    }

    /// Latest snapshot.
    #[inline]
    #[must_use]
    pub fn load(&self) -> Arc<Snapshot> {
        self.inner.load_full()
    }

    /// Read without taking ownership. Prefer for short-lived access.
    #[inline]
    pub fn load_ref(&self) -> arc_swap::Guard<Arc<Snapshot>> {
        self.inner.load()
    }

    /// Replace the snapshot and bump the version.
    pub fn store(&self, snapshot: Snapshot) {
        self.inner.store(Arc::new(snapshot));
        self.version.fetch_add(1, Ordering::Release);
    }

    /// Number of stores since construction.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new(Snapshot::idle())
    }
}
