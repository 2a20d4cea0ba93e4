//! Shared handle to the active schedule snapshot.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::info;

use super::snapshot::ScheduleSnapshot;

/// The currently active snapshot, swappable at runtime.
///
/// Readers take an `Arc` and keep using it for the whole query, so a reload
/// never changes the snapshot under an in-flight search.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    inner: Arc<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    current: RwLock<Arc<ScheduleSnapshot>>,
    version: AtomicU64,
}

impl SnapshotStore {
    /// Create a store holding an initial snapshot at version 1.
    pub fn new(snapshot: ScheduleSnapshot) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                current: RwLock::new(Arc::new(snapshot)),
                version: AtomicU64::new(1),
            }),
        }
    }

    /// The active snapshot.
    pub fn current(&self) -> Arc<ScheduleSnapshot> {
        Arc::clone(&self.inner.current.read())
    }

    /// The active snapshot together with its version.
    pub fn current_versioned(&self) -> (Arc<ScheduleSnapshot>, u64) {
        let guard = self.inner.current.read();
        (Arc::clone(&guard), self.inner.version.load(Ordering::Acquire))
    }

    /// Version of the active snapshot; bumped by every `replace`.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    /// Atomically make `snapshot` active. Returns the new version.
    pub fn replace(&self, snapshot: ScheduleSnapshot) -> u64 {
        let snapshot = Arc::new(snapshot);
        let mut guard = self.inner.current.write();
        *guard = snapshot;
        // Bumped under the write lock so readers see a matching pair
        let version = self.inner.version.fetch_add(1, Ordering::AcqRel) + 1;
        drop(guard);

        info!(version, "schedule snapshot replaced");
        version
    }
}
