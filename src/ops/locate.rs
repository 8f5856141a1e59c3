use std::path::PathBuf;

use crate::config::DistributorLookup;
use crate::error::{Error, IoResultExt, Result};
use crate::fs::is_symlink;
use crate::layout::Layout;

/// find the real directory currently published for a source repository
///
/// a repository's current content is always expressed as a symlink under a
/// channel root, never a literal path, so the channel roots are probed in
/// layout order and the first symlink found is dereferenced. all roots are
/// probed regardless of the source's own enabled flags.
pub fn locate_source(
    layout: &Layout,
    lookup: &dyn DistributorLookup,
    source_repo_id: &str,
    source_distributor_id: Option<&str>,
) -> Result<PathBuf> {
    let distributor = lookup.distributor(source_repo_id, source_distributor_id)?;

    for channel in &layout.channels {
        let candidate = channel.public_path(&distributor.relative_url);
        if is_symlink(&candidate) {
            return candidate.canonicalize().with_path(candidate);
        }
    }

    Err(Error::SourceNotFound(source_repo_id.to_string()))
}
