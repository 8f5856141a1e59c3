use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fs::switch_symlink;
use crate::layout::Channel;
use crate::ops::listing::ListingGenerator;

/// point one channel's public path at a snapshot, then refresh its indexes
///
/// the switch is atomic (temporary link renamed into place), so a reader
/// either follows the previous snapshot or the new one. returns the public
/// path that now carries the link.
pub fn publish_channel(
    snapshot_dir: &Path,
    channel: &Channel,
    relative_url: &str,
    listing: &dyn ListingGenerator,
) -> Result<PathBuf> {
    // a degenerate relative url would resolve to the channel root itself,
    // and switching it would clobber every other repository's link
    if relative_url.trim_matches('/').is_empty() {
        return Err(Error::InvalidRelativeUrl(relative_url.to_string()));
    }

    let public_path = channel.public_path(relative_url);
    switch_symlink(snapshot_dir, &public_path)?;
    listing.regenerate(&channel.root, &public_path)?;
    Ok(public_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::listing::{FileListing, NoListing, LISTING_FILE_NAME};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_publish_channel_links_and_indexes() {
        let dir = tempdir().unwrap();
        let snapshot = dir.path().join("master/zoo/100");
        fs::create_dir_all(&snapshot).unwrap();
        fs::write(snapshot.join("data"), "v1").unwrap();

        let channel = Channel::new("http", dir.path().join("http"));
        let public = publish_channel(&snapshot, &channel, "zoo/el9/", &FileListing).unwrap();

        assert_eq!(public, dir.path().join("http/zoo/el9"));
        assert_eq!(fs::read_link(&public).unwrap(), snapshot);
        // content is reachable through the link
        assert_eq!(fs::read_to_string(public.join("data")).unwrap(), "v1");
        // index written at the level above the published path
        assert_eq!(
            fs::read_to_string(dir.path().join("http/zoo").join(LISTING_FILE_NAME)).unwrap(),
            "el9\n"
        );
    }

    #[test]
    fn test_publish_channel_repoint() {
        let dir = tempdir().unwrap();
        let snap_a = dir.path().join("a");
        let snap_b = dir.path().join("b");
        fs::create_dir_all(&snap_a).unwrap();
        fs::create_dir_all(&snap_b).unwrap();

        let channel = Channel::new("http", dir.path().join("http"));
        publish_channel(&snap_a, &channel, "zoo", &NoListing).unwrap();
        let public = publish_channel(&snap_b, &channel, "zoo", &NoListing).unwrap();

        assert_eq!(fs::read_link(public).unwrap(), snap_b);
    }

    #[test]
    fn test_publish_channel_rejects_empty_relative_url() {
        let dir = tempdir().unwrap();
        let snapshot = dir.path().join("snap");
        fs::create_dir(&snapshot).unwrap();

        // another repository already published under the same root
        let channel = Channel::new("http", dir.path().join("http"));
        fs::create_dir_all(dir.path().join("http")).unwrap();
        let sibling = dir.path().join("http/other");
        std::os::unix::fs::symlink(&snapshot, &sibling).unwrap();

        for url in ["", "/", "//"] {
            let result = publish_channel(&snapshot, &channel, url, &NoListing);
            assert!(matches!(
                result,
                Err(crate::error::Error::InvalidRelativeUrl(_))
            ));
        }

        // the channel root and its other publications survive
        assert!(dir.path().join("http").is_dir());
        assert_eq!(fs::read_link(&sibling).unwrap(), snapshot);
    }

    #[test]
    fn test_publish_channel_blocked_parent() {
        let dir = tempdir().unwrap();
        let snapshot = dir.path().join("snap");
        fs::create_dir(&snapshot).unwrap();

        let channel = Channel::new("http", dir.path().join("http"));
        fs::create_dir(dir.path().join("http")).unwrap();
        fs::write(dir.path().join("http/zoo"), "a file, not a dir").unwrap();

        // parent of http/zoo/el9 cannot be created
        let result = publish_channel(&snapshot, &channel, "zoo/el9", &NoListing);
        assert!(result.is_err());
        // the blocking entry is untouched
        assert!(dir.path().join("http/zoo").is_file());
    }
}
