use std::fs;
use std::path::Path;

use crate::error::{Error, IoResultExt, Result};
use crate::fs::is_symlink;

/// name of the index file written into each directory level
pub const LISTING_FILE_NAME: &str = "listing";

/// collaborator that regenerates directory index files after a channel
/// switch
pub trait ListingGenerator {
    /// refresh indexes for the directories between a channel root and a
    /// freshly published path
    fn regenerate(&self, public_root: &Path, public_path: &Path) -> Result<()>;
}

/// writes a `listing` file at every directory level from the channel root
/// down to the published path's parent, each containing the sorted names of
/// that level's subdirectories (one per line)
#[derive(Clone, Copy, Debug, Default)]
pub struct FileListing;

impl ListingGenerator for FileListing {
    fn regenerate(&self, public_root: &Path, public_path: &Path) -> Result<()> {
        let relative = public_path
            .strip_prefix(public_root)
            .map_err(|_| Error::Listing {
                root: public_root.to_path_buf(),
                message: format!("{:?} is not under the channel root", public_path),
            })?;

        let mut current = public_root.to_path_buf();
        for component in relative.components() {
            write_listing_file(&current)?;
            current.push(component);
        }

        Ok(())
    }
}

/// no-op generator, for embedders that index elsewhere
#[derive(Clone, Copy, Debug, Default)]
pub struct NoListing;

impl ListingGenerator for NoListing {
    fn regenerate(&self, _public_root: &Path, _public_path: &Path) -> Result<()> {
        Ok(())
    }
}

/// write one directory's `listing` file
fn write_listing_file(dir: &Path) -> Result<()> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .with_path(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| {
            let path = e.path();
            // symlinked directories count: published repos are symlinks
            path.is_dir() || is_symlink(&path)
        })
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name != LISTING_FILE_NAME)
        .collect();
    names.sort();

    let mut content = names.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    fs::write(dir.join(LISTING_FILE_NAME), content).with_path(dir)
}
