//! Snapshot cache with atomic replace and a durable on-disk mirror
//!
//! `CacheStore` is the single owner of mutable catalog state. Readers take
//! an `Arc<Snapshot>` and never observe a partially written record list;
//! the refresh engine is the only mutator and always installs a complete
//! replacement. The mirror file lets the service start warm after a
//! restart: it is rewritten (atomically, via a temp file rename) on every
//! successful refresh and read once at startup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::errors::{CacheError, CacheResult};
use crate::models::{ImageRecord, Snapshot};

pub struct CacheStore {
    current: RwLock<Arc<Snapshot>>,
    mirror_path: Option<PathBuf>,
}

impl CacheStore {
    /// Create a store with an optional durable mirror
    pub fn new(mirror_path: Option<PathBuf>) -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot::empty())),
            mirror_path,
        }
    }

    /// Create a store without durable storage
    pub fn in_memory() -> Self {
        Self::new(None)
    }

    /// The current snapshot; the empty snapshot if never populated
    ///
    /// Safe to call concurrently with `replace`; the returned `Arc`
    /// stays consistent even if a replace lands immediately after.
    pub async fn snapshot(&self) -> Arc<Snapshot> {
        self.current.read().await.clone()
    }

    /// Number of records in the current snapshot
    pub async fn len(&self) -> usize {
        self.current.read().await.len()
    }

    /// Whether the cache has never been populated (or was populated empty)
    pub async fn is_empty(&self) -> bool {
        self.current.read().await.is_empty()
    }

    /// Atomically install a new snapshot built from `records`
    ///
    /// Full replacement: records absent from the new list disappear.
    /// The mirror write is best-effort: a persistence failure is logged
    /// and never rolls back the in-memory replace.
    pub async fn replace(&self, records: Vec<ImageRecord>) {
        let snapshot = Arc::new(Snapshot::new(records));

        {
            let mut current = self.current.write().await;
            *current = snapshot.clone();
        }
        debug!("Installed new snapshot with {} records", snapshot.len());

        if let Some(path) = &self.mirror_path {
            if let Err(e) = persist_mirror(path, &snapshot.images) {
                warn!("Failed to persist cache mirror to {:?}: {}", path, e);
            }
        }
    }

    /// Seed the in-memory snapshot from the durable mirror
    ///
    /// Called once at startup, before the first refresh. Returns the
    /// number of records loaded. A missing or unreadable mirror leaves
    /// the cache empty.
    pub async fn load_from_mirror(&self) -> CacheResult<usize> {
        let path = self.mirror_path.as_ref().ok_or(CacheError::MirrorNotFound {
            path: "<none configured>".to_string(),
        })?;

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CacheError::MirrorNotFound {
                    path: path.display().to_string(),
                });
            }
            Err(e) => return Err(CacheError::PersistenceFailed(e)),
        };

        let records: Vec<ImageRecord> = serde_json::from_str(&contents)?;
        let count = records.len();

        let mut current = self.current.write().await;
        *current = Arc::new(Snapshot::new(records));

        debug!("Warm-started cache with {} records from {:?}", count, path);
        Ok(count)
    }
}

/// Write the record list as JSON, atomically: temp file in the target
/// directory, then rename over the mirror path.
fn persist_mirror(path: &Path, records: &[ImageRecord]) -> CacheResult<()> {
    use std::io::Write;

    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let json = serde_json::to_string_pretty(records)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(json.as_bytes())?;
    tmp.persist(path)
        .map_err(|e| CacheError::PersistenceFailed(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(names: &[&str]) -> Vec<ImageRecord> {
        names
            .iter()
            .map(|n| ImageRecord::new(*n, format!("https://example.com/{n}")))
            .collect()
    }

    #[tokio::test]
    async fn replace_then_snapshot_round_trips_exactly() {
        let store = CacheStore::in_memory();
        let expected = records(&["a.png", "b.jpg", "c.gif"]);

        store.replace(expected.clone()).await;

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.images, expected);
        assert_eq!(store.len().await, 3);
        assert!(!store.is_empty().await);
    }

    #[tokio::test]
    async fn replace_fully_discards_previous_records() {
        let store = CacheStore::in_memory();
        store.replace(records(&["old_1.png", "old_2.png"])).await;
        store.replace(records(&["new.png"])).await;

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.images[0].name, "new.png");
    }

    #[tokio::test]
    async fn reader_holding_old_snapshot_is_unaffected_by_replace() {
        let store = CacheStore::in_memory();
        store.replace(records(&["before.png"])).await;

        let held = store.snapshot().await;
        store.replace(records(&["after.png"])).await;

        assert_eq!(held.images[0].name, "before.png");
        assert_eq!(store.snapshot().await.images[0].name, "after.png");
    }

    #[tokio::test]
    async fn mirror_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mirror.json");
        let expected = records(&["cat.png", "dog.jpg"]);

        let writer = CacheStore::new(Some(path.clone()));
        writer.replace(expected.clone()).await;

        let reader = CacheStore::new(Some(path));
        let loaded = reader.load_from_mirror().await.unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(reader.snapshot().await.images, expected);
    }

    #[tokio::test]
    async fn missing_mirror_reports_not_found_and_cache_stays_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(Some(dir.path().join("absent.json")));

        let result = store.load_from_mirror().await;
        assert!(matches!(result, Err(CacheError::MirrorNotFound { .. })));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn corrupt_mirror_reports_parse_failure_and_cache_stays_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mirror.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = CacheStore::new(Some(path));
        let result = store.load_from_mirror().await;

        assert!(matches!(result, Err(CacheError::MirrorCorrupt(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn persistence_failure_does_not_block_in_memory_replace() {
        // A mirror path whose parent cannot be created: a regular file
        // stands where the directory would go.
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "occupied").unwrap();

        let store = CacheStore::new(Some(blocker.join("mirror.json")));
        store.replace(records(&["still_served.png"])).await;

        assert_eq!(store.len().await, 1);
    }
}
