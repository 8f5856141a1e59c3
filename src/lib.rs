//! snaplink - atomic snapshot publication
//!
//! publishes a versioned snapshot of one repository's content tree into the
//! public-facing locations of another repository, on a shared filesystem.
//! every publish materializes an immutable timestamped copy under a private
//! working root, then atomically repoints each enabled channel's public
//! symlink at it, so consumers always see a complete tree and never a
//! partially-copied one.
//!
//! # Core concepts
//!
//! - **Snapshot**: an immutable, fully-populated copy of a source tree under
//!   `<master_root>/<repo-id>/<timestamp>/`
//! - **Channel**: one public output surface (conventionally "http" and
//!   "https"), each a root directory holding per-repository symlinks
//! - **Distributor**: a record naming a repository's relative publish url
//!   and which channels it is enabled on
//!
//! # Example usage
//!
//! ```no_run
//! use snaplink::{ops, Layout, DistributorStore, PublishOptions};
//! use std::path::Path;
//!
//! let layout = Layout::load(Path::new("/etc/snaplink/layout.toml")).unwrap();
//! let store = DistributorStore::load(Path::new("/etc/snaplink/distributors.toml")).unwrap();
//!
//! let options = PublishOptions::from_pairs([("source_repo_id", "upstream")]).unwrap();
//! let report = ops::publish(&layout, &store, &ops::FileListing, "mirror", &options).unwrap();
//! assert!(report.success);
//! ```

mod config;
mod error;
mod layout;

pub mod fs;
pub mod ops;

pub use config::{
    Distributor, DistributorLookup, DistributorStore, PublishOptions, OPTIONAL_OPTION_KEYS,
    REQUIRED_OPTION_KEYS,
};
pub use error::{Error, Result};
pub use layout::{Channel, Layout};
