// src/pipeline/diff.rs

//! Change detection against the previous snapshot.

use crate::models::RemoteEntry;
use crate::storage::Snapshot;

/// Select the fetched entries considered new.
///
/// An entry qualifies when its canonical name is absent from the snapshot
/// or when its target file is missing locally, so a file deleted by hand
/// is downloaded again even though the snapshot remembers it. Input order
/// is preserved.
pub fn detect_new<'a>(fetched: &'a [RemoteEntry], snapshot: &Snapshot) -> Vec<&'a RemoteEntry> {
    fetched
        .iter()
        .filter(|entry| {
            !snapshot.contains(&entry.canonical_name) || !entry.target_path.exists()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn entry(name: &str, dir: &std::path::Path) -> RemoteEntry {
        RemoteEntry::new(name, name, b"content".to_vec(), dir)
    }

    fn snapshot_of(names: &[&str]) -> Snapshot {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unknown_name_is_new() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.txt"), b"a").unwrap();

        let fetched = vec![entry("a.txt", tmp.path()), entry("b.txt", tmp.path())];
        let snapshot = snapshot_of(&["a.txt"]);

        let new_items = detect_new(&fetched, &snapshot);
        let names: Vec<&str> = new_items.iter().map(|e| e.canonical_name.as_str()).collect();
        assert_eq!(names, vec!["b.txt"]);
    }

    #[test]
    fn test_locally_missing_file_is_new_again() {
        let tmp = TempDir::new().unwrap();

        // a.txt is in the snapshot but not on disk
        let fetched = vec![entry("a.txt", tmp.path()), entry("b.txt", tmp.path())];
        let snapshot = snapshot_of(&["a.txt"]);

        let new_items = detect_new(&fetched, &snapshot);
        let names: Vec<&str> = new_items.iter().map(|e| e.canonical_name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_nothing_new() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.txt"), b"a").unwrap();
        fs::write(tmp.path().join("b.txt"), b"b").unwrap();

        let fetched = vec![entry("a.txt", tmp.path()), entry("b.txt", tmp.path())];
        let snapshot = snapshot_of(&["a.txt", "b.txt"]);

        assert!(detect_new(&fetched, &snapshot).is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let tmp = TempDir::new().unwrap();

        let fetched = vec![
            entry("z.txt", tmp.path()),
            entry("a.txt", tmp.path()),
            entry("m.txt", tmp.path()),
        ];
        let snapshot = Snapshot::new();

        let names: Vec<&str> = detect_new(&fetched, &snapshot)
            .iter()
            .map(|e| e.canonical_name.as_str())
            .collect();
        assert_eq!(names, vec!["z.txt", "a.txt", "m.txt"]);
    }
}
