// # Snapshot Store Trait
//
// Defines the interface for persisting the per-interface snapshot between
// runs. The snapshot is the only memory the checker has: whatever `load`
// returns is what the next diff is computed against.
//
// ## Implementations
//
// - File-based: one JSON file per interface
// - In-memory: tests and embedders

use async_trait::async_trait;

use crate::model::Snapshot;

/// Trait for snapshot store implementations
///
/// ## Implementation Guidelines
///
/// - **Missing is not an error**: a first run has no snapshot; return `Ok(None)`
/// - **Corruption is an error**: never silently discard unreadable history,
///   since that would hide address loss
/// - **Never persist an empty snapshot**: a capture that found nothing must
///   not overwrite the last good state
/// - **Whole-file replacement**: readers must never observe a partial write
///
/// Implementations are not required to coordinate concurrent writers.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the previous snapshot for `interface`
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Snapshot))`: A previous snapshot exists
    /// - `Ok(None)`: No history for this interface
    /// - `Err(Error)`: Storage error or corrupt snapshot
    async fn load(&self, interface: &str) -> Result<Option<Snapshot>, crate::Error>;

    /// Persist `snapshot` as the new state of `interface`
    ///
    /// Snapshots without any interface record are skipped.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Persisted or skipped
    /// - `Err(Error)`: Storage error
    async fn save(&self, interface: &str, snapshot: &Snapshot) -> Result<(), crate::Error>;
}
