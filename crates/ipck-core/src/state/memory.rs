// # Memory Snapshot Store
//
// In-memory implementation of SnapshotStore.
//
// ## Purpose
//
// Keeps snapshots for the lifetime of the process only. Useful for tests and
// for embedders that run several checks in one process and persist elsewhere.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::model::Snapshot;
use crate::traits::snapshot_store::SnapshotStore;

/// In-memory snapshot store implementation
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    inner: Arc<RwLock<HashMap<String, Snapshot>>>,
}

impl MemorySnapshotStore {
    /// Create a new empty memory snapshot store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored snapshots
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self, interface: &str) -> Result<Option<Snapshot>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.get(interface).cloned())
    }

    async fn save(&self, interface: &str, snapshot: &Snapshot) -> Result<(), Error> {
        if snapshot.is_empty() {
            return Ok(());
        }
        let mut guard = self.inner.write().await;
        guard.insert(interface.to_string(), snapshot.clone());
        Ok(())
    }
}
