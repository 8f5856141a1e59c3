use std::fs;
use std::os::unix::fs::{symlink, MetadataExt};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use nix::fcntl::AT_FDCWD;
use nix::sys::stat::{utimensat, UtimensatFlags};
use nix::sys::time::TimeSpec;
use nix::unistd::{chown, Gid, Uid};

use crate::error::{Error, IoResultExt, Result};

/// copy a directory tree, preserving symlinks as symlinks
///
/// file permissions and modification times are preserved; ownership and
/// xattrs are restored best-effort (skipped with a warning when the process
/// lacks the privilege). the destination directory is created if missing and
/// its contents are expected to be empty.
pub fn copy_tree(source: &Path, dest: &Path) -> Result<()> {
    let source_meta = fs::symlink_metadata(source).with_path(source)?;
    fs::create_dir_all(dest).with_path(dest)?;
    copy_dir_contents(source, dest)?;
    copy_metadata(source, &source_meta, dest)?;
    Ok(())
}

/// copy the entries of one directory into another (recursive helper)
fn copy_dir_contents(source: &Path, dest: &Path) -> Result<()> {
    let mut entries: Vec<_> = fs::read_dir(source)
        .with_path(source)?
        .collect::<std::io::Result<Vec<_>>>()
        .with_path(source)?;
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    for entry in entries {
        let src_path = entry.path();
        let dst_path = dest.join(entry.file_name());
        let meta = fs::symlink_metadata(&src_path).with_path(&src_path)?;
        let ft = meta.file_type();

        if ft.is_symlink() {
            // recreate the link as-is, never dereference
            let target = fs::read_link(&src_path).with_path(&src_path)?;
            symlink(&target, &dst_path).with_path(&dst_path)?;
        } else if ft.is_dir() {
            fs::create_dir(&dst_path).with_path(&dst_path)?;
            copy_dir_contents(&src_path, &dst_path)?;
            // directory metadata after contents, so mode changes can't
            // block the recursion
            copy_metadata(&src_path, &meta, &dst_path)?;
        } else if ft.is_file() {
            fs::copy(&src_path, &dst_path).with_path(&dst_path)?;
            copy_metadata(&src_path, &meta, &dst_path)?;
        } else {
            eprintln!(
                "warning: skipping special file {:?} during snapshot copy",
                src_path
            );
        }
    }

    Ok(())
}

/// restore metadata on a copied file or directory
fn copy_metadata(source: &Path, source_meta: &fs::Metadata, dest: &Path) -> Result<()> {
    copy_xattrs(source, dest);

    // ownership: only attempt when it differs from the current user, and
    // degrade to a warning without privilege
    let current_uid = nix::unistd::getuid().as_raw();
    let current_gid = nix::unistd::getgid().as_raw();
    if source_meta.uid() != current_uid || source_meta.gid() != current_gid {
        if let Err(e) = chown(
            dest,
            Some(Uid::from_raw(source_meta.uid())),
            Some(Gid::from_raw(source_meta.gid())),
        ) {
            eprintln!("warning: failed to restore ownership on {:?}: {}", dest, e);
        }
    }

    // path-based timestamp restore: the preserved mode can deny opening
    // the copy (e.g. no owner-read bits)
    if let (Some(atime), Some(mtime)) = (
        timespec_of(source_meta.accessed()),
        timespec_of(source_meta.modified()),
    ) {
        utimensat(AT_FDCWD, dest, &atime, &mtime, UtimensatFlags::NoFollowSymlink).map_err(
            |e| Error::Io {
                path: dest.to_path_buf(),
                source: e.into(),
            },
        )?;
    }

    fs::set_permissions(dest, source_meta.permissions()).with_path(dest)?;

    Ok(())
}

/// convert a filesystem timestamp to a nanosecond timespec
fn timespec_of(time: std::io::Result<SystemTime>) -> Option<TimeSpec> {
    let time = time.ok()?;
    let since_epoch = time.duration_since(UNIX_EPOCH).ok()?;
    Some(TimeSpec::from_duration(since_epoch))
}

/// copy extended attributes, best-effort
fn copy_xattrs(source: &Path, dest: &Path) {
    let names = match xattr::list(source) {
        Ok(iter) => iter,
        // ENOTSUP or similar: filesystem has no xattrs, nothing to copy
        Err(_) => return,
    };

    for name in names {
        match xattr::get(source, &name) {
            Ok(Some(value)) => {
                if let Err(e) = xattr::set(dest, &name, &value) {
                    eprintln!(
                        "warning: failed to copy xattr {:?} to {:?}: {}",
                        name, dest, e
                    );
                }
            }
            // removed between list and get, or unreadable: skip
            Ok(None) | Err(_) => {}
        }
    }
}

/// fail early when a copy source is missing
pub fn require_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(Error::SourceMissing(path.to_path_buf()));
    }
    Ok(())
}
