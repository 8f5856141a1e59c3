use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use walkdir::WalkDir;

use crate::error::{Error, IoResultExt, Result};
use crate::fs::copy::{copy_tree, require_dir};

/// name for a new snapshot, captured once at the start of a publish run
///
/// nanosecond resolution: second-granularity names collide when two runs
/// start within the same second, and pruning compares names.
pub fn snapshot_name() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
        .to_string()
}

/// materialize an immutable snapshot of a source tree
///
/// the destination is clobbered if it already exists (a retried run), then
/// the whole tree is copied with symlinks and metadata preserved. no public
/// path references the destination until the caller switches a channel, so
/// readers never see a partial copy.
pub fn write_snapshot(source: &Path, dest: &Path) -> Result<()> {
    require_dir(source)?;

    if dest.exists() {
        fs::remove_dir_all(dest).with_path(dest)?;
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).with_path(parent)?;
    }

    copy_tree(source, dest)
}

/// size counters for a materialized snapshot
#[derive(Debug, Default)]
pub struct SnapshotStats {
    pub files: usize,
    pub bytes: u64,
}

/// count the regular files and their bytes under a snapshot directory
pub fn snapshot_stats(dir: &Path) -> Result<SnapshotStats> {
    let mut stats = SnapshotStats::default();

    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| Error::Io {
            path: dir.to_path_buf(),
            source: e.into_io_error().unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::Other, "walkdir error")
            }),
        })?;

        if entry.file_type().is_file() {
            let meta = fs::symlink_metadata(entry.path()).with_path(entry.path())?;
            stats.files += 1;
            stats.bytes += meta.len();
        }
    }

    Ok(stats)
}
