// # File Snapshot Store
//
// File-based implementation of SnapshotStore.
//
// ## Layout
//
// One JSON file per interface, `<dir>/<interface>.json`. The directory is
// created on first save.
//
// ## Write Safety
//
// - Atomic replacement: new content is written to `<interface>.tmp`, flushed,
//   then renamed over the target
// - A failed replacement removes the temp file again
// - Empty snapshots are never written
// - Corruption is reported, not recovered from
//
// ## Concurrency
//
// There is no file locking. Two runs against the same interface at the same
// time can both load the same previous snapshot and the later rename wins.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::model::Snapshot;
use crate::traits::snapshot_store::SnapshotStore;

/// Directory-backed snapshot store
///
/// # Example
///
/// ```rust,no_run
/// use ipck_core::state::FileSnapshotStore;
/// use ipck_core::traits::SnapshotStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileSnapshotStore::new("/var/lib/ipck");
///
///     if let Some(previous) = store.load("eth0").await? {
///         println!("last captured at {}", previous.captured_at);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    /// Create a store rooted at `dir`
    ///
    /// Nothing is touched on disk until the first save.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Directory holding the snapshot files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the snapshot file for `interface`
    pub fn snapshot_path(&self, interface: &str) -> PathBuf {
        self.dir.join(format!("{}.json", interface))
    }

    /// Get path to temporary file for atomic writes
    fn temp_path(&self, interface: &str) -> PathBuf {
        let mut temp = self.snapshot_path(interface);
        temp.set_extension("tmp");
        temp
    }

    async fn ensure_dir(&self) -> Result<(), Error> {
        if self.dir.as_os_str().is_empty() {
            return Ok(());
        }
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            Error::state_store(format!(
                "Failed to create snapshot directory {}: {}",
                self.dir.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn load(&self, interface: &str) -> Result<Option<Snapshot>, Error> {
        let path = self.snapshot_path(interface);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No previous snapshot at {}", path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(Error::state_store(format!(
                    "Failed to read snapshot {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let snapshot: Snapshot = serde_json::from_str(&content)
            .map_err(|e| Error::corrupt_state(&path, e.to_string()))?;

        tracing::debug!(
            "Loaded snapshot {} captured at {} ({} interface(s))",
            path.display(),
            snapshot.captured_at,
            snapshot.interfaces.len()
        );
        Ok(Some(snapshot))
    }

    async fn save(&self, interface: &str, snapshot: &Snapshot) -> Result<(), Error> {
        self.ensure_dir().await?;

        if snapshot.is_empty() {
            tracing::debug!("Snapshot for {} has no interfaces, not writing", interface);
            return Ok(());
        }

        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| Error::state_store(format!("Failed to serialize snapshot: {}", e)))?;

        let path = self.snapshot_path(interface);
        let temp_path = self.temp_path(interface);
        if let Err(e) = replace_file(&temp_path, &path, json.as_bytes()).await {
            // Best effort; the original error is what matters
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        tracing::trace!("Snapshot written to {}", path.display());
        Ok(())
    }
}

/// Write `content` to `temp_path`, flush it, then rename it over `path`
async fn replace_file(temp_path: &Path, path: &Path, content: &[u8]) -> Result<(), Error> {
    let mut file = fs::File::create(temp_path).await.map_err(|e| {
        Error::state_store(format!(
            "Failed to create temp file {}: {}",
            temp_path.display(),
            e
        ))
    })?;

    file.write_all(content).await.map_err(|e| {
        Error::state_store(format!(
            "Failed to write to temp file {}: {}",
            temp_path.display(),
            e
        ))
    })?;

    file.flush().await.map_err(|e| {
        Error::state_store(format!(
            "Failed to flush temp file {}: {}",
            temp_path.display(),
            e
        ))
    })?;
    drop(file);

    fs::rename(temp_path, path).await.map_err(|e| {
        Error::state_store(format!(
            "Failed to rename {} to {}: {}",
            temp_path.display(),
            path.display(),
            e
        ))
    })
}
