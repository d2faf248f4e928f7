//! Remote archive entry.

use std::path::PathBuf;

/// A single file found inside the fetched archive.
///
/// Built once per fetch and immutable within a run. Only the canonical
/// name outlives the run, as a member of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// File name as stored remotely
    pub original_name: String,

    /// Normalized identity used for snapshot membership and local naming
    pub canonical_name: String,

    /// Full file content
    pub content: Vec<u8>,

    /// Local path the file is persisted to
    pub target_path: PathBuf,
}

impl RemoteEntry {
    /// Create an entry, deriving the target path from the storage root.
    pub fn new(
        original_name: impl Into<String>,
        canonical_name: impl Into<String>,
        content: Vec<u8>,
        storage_dir: &std::path::Path,
    ) -> Self {
        let canonical_name = canonical_name.into();
        let target_path = storage_dir.join(&canonical_name);
        Self {
            original_name: original_name.into(),
            canonical_name,
            content,
            target_path,
        }
    }
}
