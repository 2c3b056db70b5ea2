//! Rehydrate a capsule manifest with its canonical payload.
//!
//! Usage:
//!   rehydrate capsules/demo
//!   rehydrate capsules/demo --out artifacts/demo.json
//!   rehydrate capsules/demo --timestamp 2024-01-01T00:00:00Z --no-update-manifest
//!
//! Prints the resolved output path on success. Missing manifest or canonical
//! payload files are reported as a clean `error:` line; any other failure
//! surfaces with its full context chain. Exit status is non-zero on failure.

use capsulekit::{HydrateOptions, NotFound, rehydrate_capsule};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rehydrate")]
#[command(about = "Rehydrate a capsule manifest with its canonical payload")]
struct Cli {
    /// Capsule directory containing manifest.json and the canonical payload.
    capsule: PathBuf,
    /// Explicit path for the hydrated artifact.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Override the timestamp recorded in the manifest.
    #[arg(long)]
    timestamp: Option<String>,
    /// Do not persist canonical metadata back to the manifest.
    #[arg(long)]
    no_update_manifest: bool,
}

fn main() {
    let cli = Cli::parse();
    let options = HydrateOptions {
        out_path: cli.out,
        timestamp: cli.timestamp,
        update_manifest: !cli.no_update_manifest,
    };

    match rehydrate_capsule(&cli.capsule, &options) {
        Ok(out_path) => println!("{}", out_path.display()),
        Err(err) => {
            match err.downcast_ref::<NotFound>() {
                Some(not_found) => eprintln!("error: {not_found}"),
                None => eprintln!("{err:#}"),
            }
            std::process::exit(1);
        }
    }
}
