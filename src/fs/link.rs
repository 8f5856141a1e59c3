use std::fs;
use std::os::unix::fs::symlink;
use std::path::Path;

use crate::error::{Error, IoResultExt, Result};

/// check whether a path is a symlink (without following it)
pub fn is_symlink(path: &Path) -> bool {
    path.symlink_metadata()
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// atomically point a public path at a target directory
///
/// the new link is created under a temporary name next to the public path
/// and renamed into place, so readers always see either the previous link
/// or the new one, never a missing entry. missing parent directories are
/// created first.
pub fn switch_symlink(target: &Path, link_path: &Path) -> Result<()> {
    let parent = match link_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_path(parent)?;

    // rename cannot replace a directory. a plain directory at the public
    // path only happens on first-time conversion from unlinked layouts.
    match link_path.symlink_metadata() {
        Ok(meta) if meta.file_type().is_dir() => {
            fs::remove_dir_all(link_path).with_path(link_path)?;
        }
        _ => {}
    }

    let tmp = parent.join(format!(".{}.tmp", uuid::Uuid::new_v4()));
    symlink(target, &tmp).with_path(&tmp)?;

    if let Err(e) = fs::rename(&tmp, link_path) {
        let _ = fs::remove_file(&tmp);
        return Err(Error::Io {
            path: link_path.to_path_buf(),
            source: e,
        });
    }

    Ok(())
}
