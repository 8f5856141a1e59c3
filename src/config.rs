use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, IoResultExt, Result};

/// configuration keys a publish run must carry
pub const REQUIRED_OPTION_KEYS: &[&str] = &[];

/// configuration keys a publish run may carry
///
/// `source_repository_id` is an accepted spelling of `source_repo_id`.
pub const OPTIONAL_OPTION_KEYS: &[&str] = &[
    "source_repo_id",
    "source_repository_id",
    "source_distributor_id",
    "destination_distributor_id",
];

/// validated per-run publication options
///
/// built from raw key/value pairs so callers that receive an untyped option
/// map can reject unrecognized keys before any filesystem work happens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PublishOptions {
    /// repository whose currently published tree is cloned
    pub source_repo_id: Option<String>,
    /// which of the source's distributor records supplies its relative url
    pub source_distributor_id: Option<String>,
    /// which of the destination's distributor records supplies channels
    pub destination_distributor_id: Option<String>,
}

impl PublishOptions {
    /// build options from raw pairs, rejecting unsupported keys
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut options = Self::default();
        let mut seen = Vec::new();

        for (key, value) in pairs {
            let key = key.as_ref();
            match key {
                "source_repo_id" | "source_repository_id" => {
                    options.source_repo_id = Some(value.into())
                }
                "source_distributor_id" => options.source_distributor_id = Some(value.into()),
                "destination_distributor_id" => {
                    options.destination_distributor_id = Some(value.into())
                }
                _ => return Err(Error::UnsupportedConfigKey(key.to_string())),
            }
            seen.push(key.to_string());
        }

        for key in REQUIRED_OPTION_KEYS {
            if !seen.iter().any(|s| s == key) {
                return Err(Error::MissingConfigKey((*key).to_string()));
            }
        }

        Ok(options)
    }

    /// source repository id, required once a publish actually starts
    pub fn require_source_repo(&self) -> Result<&str> {
        self.source_repo_id
            .as_deref()
            .ok_or_else(|| Error::MissingConfigKey("source_repo_id".to_string()))
    }
}

/// a distributor record: how one repository is exposed on the public roots
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distributor {
    /// repository this record belongs to
    pub repo_id: String,
    /// distributor id, distinguishing multiple records for one repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// publish path relative to each channel root
    pub relative_url: String,
    /// per-channel enabled flags
    #[serde(default)]
    pub channels: BTreeMap<String, bool>,
}

impl Distributor {
    /// whether this record publishes through the named channel
    pub fn enabled(&self, channel: &str) -> bool {
        self.channels.get(channel).copied().unwrap_or(false)
    }
}

/// collaborator that resolves which distributor record belongs to a repository
pub trait DistributorLookup {
    /// find the record for a repository, optionally by distributor id
    ///
    /// with no id, the first record for the repository wins.
    fn distributor(&self, repo_id: &str, distributor_id: Option<&str>) -> Result<Distributor>;
}

/// TOML-backed set of distributor records
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DistributorStore {
    #[serde(default)]
    pub distributors: Vec<Distributor>,
}

impl DistributorStore {
    /// load records from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_path(path)?;
        let store: DistributorStore = toml::from_str(&content)?;
        Ok(store)
    }

    /// save records to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).with_path(path)?;
        Ok(())
    }

    /// add a record
    pub fn add(&mut self, distributor: Distributor) {
        self.distributors.push(distributor);
    }
}

impl DistributorLookup for DistributorStore {
    fn distributor(&self, repo_id: &str, distributor_id: Option<&str>) -> Result<Distributor> {
        self.distributors
            .iter()
            .find(|d| {
                d.repo_id == repo_id
                    && match distributor_id {
                        Some(id) => d.id.as_deref() == Some(id),
                        None => true,
                    }
            })
            .cloned()
            .ok_or_else(|| Error::DistributorNotFound(repo_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(repo_id: &str, id: Option<&str>, relative_url: &str) -> Distributor {
        Distributor {
            repo_id: repo_id.to_string(),
            id: id.map(str::to_string),
            relative_url: relative_url.to_string(),
            channels: BTreeMap::from([("http".to_string(), true), ("https".to_string(), false)]),
        }
    }

    #[test]
    fn test_options_from_pairs() {
        let options = PublishOptions::from_pairs([
            ("source_repo_id", "zoo"),
            ("destination_distributor_id", "mirror"),
        ])
        .unwrap();

        assert_eq!(options.source_repo_id.as_deref(), Some("zoo"));
        assert_eq!(options.destination_distributor_id.as_deref(), Some("mirror"));
        assert!(options.source_distributor_id.is_none());
    }

    #[test]
    fn test_options_accept_long_source_key_spelling() {
        let options =
            PublishOptions::from_pairs([("source_repository_id", "zoo")]).unwrap();
        assert_eq!(options.source_repo_id.as_deref(), Some("zoo"));
    }

    #[test]
    fn test_options_reject_unknown_key() {
        let result = PublishOptions::from_pairs([("relative_url", "zoo")]);
        match result {
            Err(Error::UnsupportedConfigKey(key)) => assert_eq!(key, "relative_url"),
            other => panic!("expected UnsupportedConfigKey, got {:?}", other),
        }
    }

    #[test]
    fn test_options_require_source_repo() {
        let options = PublishOptions::default();
        assert!(matches!(
            options.require_source_repo(),
            Err(Error::MissingConfigKey(_))
        ));
    }

    #[test]
    fn test_distributor_enabled_defaults_false() {
        let d = record("zoo", None, "zoo/el9");
        assert!(d.enabled("http"));
        assert!(!d.enabled("https"));
        assert!(!d.enabled("ftp"));
    }

    #[test]
    fn test_store_lookup_by_repo() {
        let mut store = DistributorStore::default();
        store.add(record("zoo", Some("a"), "zoo/a"));
        store.add(record("zoo", Some("b"), "zoo/b"));

        let first = store.distributor("zoo", None).unwrap();
        assert_eq!(first.relative_url, "zoo/a");

        let by_id = store.distributor("zoo", Some("b")).unwrap();
        assert_eq!(by_id.relative_url, "zoo/b");

        assert!(matches!(
            store.distributor("zoo", Some("c")),
            Err(Error::DistributorNotFound(_))
        ));
        assert!(matches!(
            store.distributor("ark", None),
            Err(Error::DistributorNotFound(_))
        ));
    }

    #[test]
    fn test_store_toml_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("distributors.toml");

        let mut store = DistributorStore::default();
        store.add(record("zoo", None, "zoo/el9"));
        store.save(&path).unwrap();

        let loaded = DistributorStore::load(&path).unwrap();
        assert_eq!(loaded.distributors, store.distributors);
    }
}
