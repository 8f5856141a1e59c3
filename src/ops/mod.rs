//! high-level publication operations

mod channel;
mod listing;
mod locate;
mod publish;
mod reap;
mod snapshot;

pub use channel::publish_channel;
pub use listing::{FileListing, ListingGenerator, NoListing, LISTING_FILE_NAME};
pub use locate::locate_source;
pub use publish::{publish, PublishReport};
pub use reap::prune;
pub use snapshot::{snapshot_name, snapshot_stats, write_snapshot, SnapshotStats};
