use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IoResultExt, Result};

/// filesystem layout for publication, stored in layout.toml
///
/// channel order in the file is significant: it is both the probe priority
/// when locating a source and the publish order for the destination.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Layout {
    /// private working root holding per-repository snapshot directories
    pub master_root: PathBuf,
    /// public channels, in priority order
    #[serde(default)]
    pub channels: Vec<Channel>,
}

impl Layout {
    /// create a layout with the given working root and no channels
    pub fn new(master_root: impl Into<PathBuf>) -> Self {
        Self {
            master_root: master_root.into(),
            channels: vec![],
        }
    }

    /// load layout from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_path(path)?;
        let layout: Layout = toml::from_str(&content)?;
        Ok(layout)
    }

    /// save layout to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).with_path(path)?;
        Ok(())
    }

    /// add a channel at the end of the priority order
    pub fn add_channel(&mut self, name: impl Into<String>, root: impl Into<PathBuf>) {
        self.channels.push(Channel {
            name: name.into(),
            root: root.into(),
        });
    }

    /// get a channel by name
    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.name == name)
    }

    /// working root for a repository, holding all of its snapshots
    pub fn working_root(&self, repo_id: &str) -> PathBuf {
        self.master_root.join(repo_id)
    }

    /// directory for a single named snapshot of a repository
    pub fn snapshot_dir(&self, repo_id: &str, snapshot: &str) -> PathBuf {
        self.working_root(repo_id).join(snapshot)
    }
}

/// one public output surface: a named channel rooted at a public directory
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    pub root: PathBuf,
}

impl Channel {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }

    /// public path for a repository published through this channel
    ///
    /// trailing separators on the relative url are stripped so the result
    /// can be unlinked and relinked as a single entry.
    pub fn public_path(&self, relative_url: &str) -> PathBuf {
        self.root.join(relative_url.trim_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_layout_toml_roundtrip() {
        let mut layout = Layout::new("/var/lib/pub/master");
        layout.add_channel("http", "/var/lib/pub/http/repos");
        layout.add_channel("https", "/var/lib/pub/https/repos");

        let toml_str = toml::to_string_pretty(&layout).unwrap();
        let parsed: Layout = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.master_root, layout.master_root);
        assert_eq!(parsed.channels, layout.channels);
    }

    #[test]
    fn test_layout_load_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.toml");

        let mut layout = Layout::new(dir.path().join("master"));
        layout.add_channel("http", dir.path().join("http"));
        layout.save(&path).unwrap();

        let loaded = Layout::load(&path).unwrap();
        assert_eq!(loaded.channels.len(), 1);
        assert_eq!(loaded.channels[0].name, "http");
        assert!(loaded.channel("http").is_some());
        assert!(loaded.channel("ftp").is_none());
    }

    #[test]
    fn test_channel_order_preserved() {
        let mut layout = Layout::new("/master");
        layout.add_channel("https", "/https");
        layout.add_channel("http", "/http");

        let names: Vec<_> = layout.channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["https", "http"]);
    }

    #[test]
    fn test_working_and_snapshot_dirs() {
        let layout = Layout::new("/master");
        assert_eq!(layout.working_root("zoo"), PathBuf::from("/master/zoo"));
        assert_eq!(
            layout.snapshot_dir("zoo", "1700000000"),
            PathBuf::from("/master/zoo/1700000000")
        );
    }

    #[test]
    fn test_public_path_strips_trailing_separator() {
        let channel = Channel::new("http", "/http/repos");
        assert_eq!(
            channel.public_path("zoo/el9/"),
            PathBuf::from("/http/repos/zoo/el9")
        );
        assert_eq!(
            channel.public_path("zoo/el9"),
            PathBuf::from("/http/repos/zoo/el9")
        );
    }
}
