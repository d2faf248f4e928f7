// src/storage/mod.rs

//! Snapshot persistence.
//!
//! The snapshot is the durable record of canonical names observed as of
//! the end of the last successful run, stored as a sorted JSON string
//! array so history stays human-diffable.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tokio::io::AsyncWriteExt;

use crate::error::Result;

/// Set of previously seen canonical names. `BTreeSet` keeps serialization
/// deterministic (sorted) without an extra sort step.
pub type Snapshot = BTreeSet<String>;

/// Durable store for the snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the persisted snapshot.
    ///
    /// Never fails: a missing or unparseable file yields an empty set, so
    /// a corrupt snapshot degrades to a full re-detection rather than a
    /// dead monitor.
    pub async fn load(&self) -> Snapshot {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Snapshot::new(),
            Err(e) => {
                log::warn!("Snapshot at {:?} unreadable ({e}), starting fresh", self.path);
                return Snapshot::new();
            }
        };

        match serde_json::from_slice::<Vec<String>>(&bytes) {
            Ok(names) => names.into_iter().collect(),
            Err(e) => {
                log::warn!("Snapshot at {:?} malformed ({e}), starting fresh", self.path);
                Snapshot::new()
            }
        }
    }

    /// Overwrite the snapshot file (write to temp, then rename).
    pub async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(snapshot)?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn snapshot_of(names: &[&str]) -> Snapshot {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path().join("data/snapshot.json"));

        let snapshot = snapshot_of(&["b.txt", "a.txt", "c.pdf"]);
        store.save(&snapshot).await.unwrap();

        assert_eq!(store.load().await, snapshot);
    }

    #[tokio::test]
    async fn test_round_trip_empty_set() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path().join("snapshot.json"));

        store.save(&Snapshot::new()).await.unwrap();
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path().join("nope.json"));

        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("snapshot.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let store = SnapshotStore::new(&path);
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path().join("snapshot.json"));

        store.save(&snapshot_of(&["old.txt"])).await.unwrap();
        store.save(&snapshot_of(&["new.txt"])).await.unwrap();

        assert_eq!(store.load().await, snapshot_of(&["new.txt"]));
    }

    #[tokio::test]
    async fn test_serialized_form_is_sorted() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("snapshot.json");
        let store = SnapshotStore::new(&path);

        store.save(&snapshot_of(&["z.txt", "a.txt", "m.txt"])).await.unwrap();

        let text = tokio::fs::read_to_string(&path).await.unwrap();
        let a = text.find("a.txt").unwrap();
        let m = text.find("m.txt").unwrap();
        let z = text.find("z.txt").unwrap();
        assert!(a < m && m < z);
    }
}
