//! snaplink CLI - snapshot publication command line interface

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use snaplink::ops::{locate_source, prune, publish, FileListing, NoListing, PublishReport};
use snaplink::{DistributorStore, Error, Layout, PublishOptions};

#[derive(Parser)]
#[command(name = "snaplink")]
#[command(about = "atomic snapshot publication for shared-filesystem content trees")]
#[command(version)]
struct Cli {
    /// layout file (working root and channel roots)
    #[arg(short, long, env = "SNAPLINK_LAYOUT", default_value = "layout.toml")]
    layout: PathBuf,

    /// distributor records file
    #[arg(
        short,
        long,
        env = "SNAPLINK_DISTRIBUTORS",
        default_value = "distributors.toml"
    )]
    distributors: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// clone a source repository's published tree into a destination
    Publish {
        /// destination repository id
        repo_id: String,

        /// repository whose current publication is cloned
        #[arg(short, long)]
        source_repo: Option<String>,

        /// distributor id on the source side
        #[arg(long)]
        source_distributor: Option<String>,

        /// distributor id on the destination side
        #[arg(long)]
        destination_distributor: Option<String>,

        /// raw option as KEY=VALUE (validated against the supported set)
        #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
        options: Vec<String>,

        /// skip listing index regeneration
        #[arg(long)]
        no_listing: bool,
    },

    /// resolve and print a repository's currently published directory
    Locate {
        /// repository id
        repo_id: String,

        /// distributor id
        #[arg(long)]
        distributor: Option<String>,
    },

    /// list snapshot directories in a repository's working root
    Snapshots {
        /// repository id
        repo_id: String,
    },

    /// remove every snapshot except the named one
    Prune {
        /// repository id
        repo_id: String,

        /// snapshot name to keep
        #[arg(short, long)]
        keep: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> snaplink::Result<ExitCode> {
    let layout = Layout::load(&cli.layout)?;
    let store = DistributorStore::load(&cli.distributors)?;

    match cli.command {
        Commands::Publish {
            repo_id,
            source_repo,
            source_distributor,
            destination_distributor,
            options,
            no_listing,
        } => {
            let mut pairs = Vec::new();
            for raw in &options {
                pairs.push(split_option(raw)?);
            }
            if let Some(v) = source_repo {
                pairs.push(("source_repo_id".to_string(), v));
            }
            if let Some(v) = source_distributor {
                pairs.push(("source_distributor_id".to_string(), v));
            }
            if let Some(v) = destination_distributor {
                pairs.push(("destination_distributor_id".to_string(), v));
            }
            let publish_options = PublishOptions::from_pairs(pairs)?;

            let report = if no_listing {
                publish(&layout, &store, &NoListing, &repo_id, &publish_options)?
            } else {
                publish(&layout, &store, &FileListing, &repo_id, &publish_options)?
            };

            print_report(&report);
            if report.success {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }

        Commands::Locate {
            repo_id,
            distributor,
        } => {
            let dir = locate_source(&layout, &store, &repo_id, distributor.as_deref())?;
            println!("{}", dir.display());
            Ok(ExitCode::SUCCESS)
        }

        Commands::Snapshots { repo_id } => {
            let working = layout.working_root(&repo_id);
            if working.is_dir() {
                let mut names: Vec<String> = std::fs::read_dir(&working)
                    .map_err(|e| Error::Io {
                        path: working.clone(),
                        source: e,
                    })?
                    .filter_map(|e| e.ok())
                    .filter(|e| e.path().is_dir())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect();
                names.sort();
                for name in names {
                    println!("{}", name);
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Prune { repo_id, keep } => {
            let removed = prune(&layout.working_root(&repo_id), &keep)?;
            println!("removed {} snapshots", removed);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn split_option(raw: &str) -> snaplink::Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(Error::UnsupportedConfigKey(raw.to_string())),
    }
}

fn print_report(report: &PublishReport) {
    println!("success: {}", report.success);
    for (key, value) in &report.details {
        println!("{}: {}", key, value);
    }
    for error in &report.errors {
        eprintln!("error: {}", error);
    }
}
