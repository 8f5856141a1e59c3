use std::path::PathBuf;

/// error type for snaplink operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration key '{0}' is not supported")]
    UnsupportedConfigKey(String),

    #[error("missing required configuration key: {0}")]
    MissingConfigKey(String),

    #[error("no distributor record for repository '{0}'")]
    DistributorNotFound(String),

    #[error("relative url '{0}' does not name a path below the channel root")]
    InvalidRelativeUrl(String),

    #[error("could not find a published directory for '{0}'")]
    SourceNotFound(String),

    #[error("snapshot source does not exist: {0}")]
    SourceMissing(PathBuf),

    #[error("listing regeneration failed under {root}: {message}")]
    Listing { root: PathBuf, message: String },

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// helper to wrap io errors with path context
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
