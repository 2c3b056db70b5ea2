//! Emit the capsule cartesian map for inspection or downstream jobs.
//!
//! Usage:
//!   cartesian-map
//!   cartesian-map --format markdown

use anyhow::Result;
use capsulekit::{build_default_map, emit_json, emit_markdown};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "cartesian-map")]
#[command(about = "Emit the capsule cartesian map")]
struct Cli {
    /// Output format to emit.
    #[arg(long, default_value = "json", value_parser = ["json", "markdown"])]
    format: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let map = build_default_map();
    match cli.format.as_str() {
        "markdown" => println!("{}", emit_markdown(&map)),
        _ => println!("{}", emit_json(&map)?),
    }
    Ok(())
}
