//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for redcap-export using clap.

pub mod export;

use clap::Parser;
use std::path::PathBuf;

/// redcap-export - per-event CSV export of a longitudinal REDCap project
#[derive(Parser, Debug)]
#[command(name = "redcap-export")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// CSV listing instruments, with `instrument_name` and `download` columns
    pub selection_file: PathBuf,

    /// Existing directory to write `<event>.csv` files into
    pub out_dir: PathBuf,

    /// Path to an optional TOML configuration file
    #[arg(short, long, env = "REDCAP_EXPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Log the per-event plan without exporting data or writing files
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Execute the export
    pub async fn execute(&self) -> anyhow::Result<i32> {
        export::run(self).await
    }
}
