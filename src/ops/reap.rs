use std::fs;
use std::path::Path;

use crate::error::{IoResultExt, Result};

/// remove superseded snapshots from a repository's working root
///
/// every immediate subdirectory whose name is not `keep` is deleted
/// recursively. non-directory entries are left untouched. there is no
/// retention window: only the snapshot just published survives. returns the
/// number of snapshots removed.
pub fn prune(working_root: &Path, keep: &str) -> Result<usize> {
    if !working_root.is_dir() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(working_root).with_path(working_root)? {
        let entry = entry.with_path(working_root)?;
        let path = entry.path();
        if path.is_dir() && entry.file_name() != keep {
            fs::remove_dir_all(&path).with_path(&path)?;
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_prune_keeps_only_named_snapshot() {
        let dir = tempdir().unwrap();
        for name in ["100", "150", "200", "250"] {
            fs::create_dir_all(dir.path().join(name).join("content")).unwrap();
        }

        let removed = prune(dir.path(), "250").unwrap();
        assert_eq!(removed, 3);

        let remaining: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(remaining, ["250"]);
    }

    #[test]
    fn test_prune_leaves_non_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("100")).unwrap();
        fs::create_dir(dir.path().join("200")).unwrap();
        fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

        let removed = prune(dir.path(), "200").unwrap();
        assert_eq!(removed, 1);
        assert!(dir.path().join("notes.txt").exists());
        assert!(dir.path().join("200").exists());
    }

    #[test]
    fn test_prune_missing_root_is_noop() {
        let dir = tempdir().unwrap();
        let removed = prune(&dir.path().join("absent"), "100").unwrap();
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_prune_nothing_to_remove() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("100")).unwrap();
        let removed = prune(dir.path(), "100").unwrap();
        assert_eq!(removed, 0);
        assert!(dir.path().join("100").exists());
    }
}
