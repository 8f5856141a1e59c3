use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;

use crate::config::{DistributorLookup, PublishOptions};
use crate::error::Result;
use crate::layout::Layout;
use crate::ops::channel::publish_channel;
use crate::ops::listing::ListingGenerator;
use crate::ops::locate::locate_source;
use crate::ops::reap::prune;
use crate::ops::snapshot::{snapshot_name, snapshot_stats, write_snapshot};

/// outcome of a publish run
///
/// `success` is true iff no error was recorded during locate, write, or any
/// channel publish. partial publication (one channel switched, another not)
/// is reported here, never hidden.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PublishReport {
    pub success: bool,
    pub errors: Vec<String>,
    pub details: BTreeMap<String, String>,
}

impl PublishReport {
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn add_detail(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.details.insert(key.into(), value.into());
    }
}

/// clone a source repository's published tree into a destination repository
///
/// the pipeline is linear: locate source, write snapshot, switch each
/// enabled channel, prune old snapshots. failures before the snapshot is
/// complete abort with `Err` and no public path is touched. failures after
/// that point are accumulated into the report; each channel is attempted
/// independently, and pruning runs whenever a snapshot was written so disk
/// usage cannot grow across failed attempts.
pub fn publish(
    layout: &Layout,
    lookup: &dyn DistributorLookup,
    listing: &dyn ListingGenerator,
    repo_id: &str,
    options: &PublishOptions,
) -> Result<PublishReport> {
    let start = Instant::now();
    let mut report = PublishReport::default();

    let source_repo_id = options.require_source_repo()?;
    let destination =
        lookup.distributor(repo_id, options.destination_distributor_id.as_deref())?;

    let source_dir = locate_source(
        layout,
        lookup,
        source_repo_id,
        options.source_distributor_id.as_deref(),
    )?;

    let name = snapshot_name();
    let snapshot = layout.snapshot_dir(repo_id, &name);
    write_snapshot(&source_dir, &snapshot)?;

    // observability only, never affects the outcome
    match snapshot_stats(&snapshot) {
        Ok(stats) => {
            report.add_detail("files", stats.files.to_string());
            report.add_detail("bytes", stats.bytes.to_string());
        }
        Err(e) => eprintln!("warning: failed to stat snapshot {:?}: {}", snapshot, e),
    }

    // channels are sequential and in layout order so outcomes are
    // deterministic; one channel's failure never blocks the next
    let mut published = Vec::new();
    for channel in &layout.channels {
        if !destination.enabled(&channel.name) {
            continue;
        }
        match publish_channel(&snapshot, channel, &destination.relative_url, listing) {
            Ok(_) => published.push(channel.name.clone()),
            Err(e) => report.add_error(format!("channel {}: {}", channel.name, e)),
        }
    }

    // the snapshot exists, so prune runs even after channel failures
    match prune(&layout.working_root(repo_id), &name) {
        Ok(removed) => report.add_detail("pruned", removed.to_string()),
        Err(e) => report.add_error(format!("prune: {}", e)),
    }

    report.add_detail("repo_id", repo_id);
    report.add_detail("source_repo_id", source_repo_id);
    report.add_detail("source_dir", source_dir.to_string_lossy());
    report.add_detail("snapshot", snapshot.to_string_lossy());
    report.add_detail("channels", published.join(","));
    report.add_detail("elapsed_ms", start.elapsed().as_millis().to_string());

    report.success = report.errors.is_empty();
    Ok(report)
}
