// redcap-export - REDCap per-event CSV export
// Copyright (c) 2025 redcap-export Contributors
// Licensed under the MIT License

//! # redcap-export
//!
//! Exports a longitudinal REDCap project to one CSV file per event, limited
//! to the records matching a filter expression and to a curated list of
//! instruments.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Resolving** the records that match REDCap filter logic in an anchor event
//! - **Selecting** instruments from a CSV list of `instrument_name`/`download` rows
//! - **Mapping** instruments to events via the project's form-event designations
//! - **Exporting** each event's eligible records for the selected instruments it has
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Eligibility, selection, form-event mapping, and per-event export
//! - [`adapters`] - REDCap API client
//! - [`domain`] - Identifier newtypes, tabular data, and errors
//! - [`config`] - Configuration from environment and optional TOML file
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use redcap_export::adapters::redcap::RedcapClient;
//! use redcap_export::config::load_config;
//! use redcap_export::core::export::ExportCoordinator;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config(None)?;
//!     let client = Arc::new(RedcapClient::new(&config.redcap)?);
//!
//!     let coordinator = ExportCoordinator::new(&config, client)?;
//!     let summary = coordinator
//!         .execute_export(Path::new("instruments.csv"), Path::new("out"))
//!         .await?;
//!
//!     println!("Wrote {} event files", summary.files_written());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`], carrying a
//! [`domain::ExportError`]. Each error maps to a process exit code with
//! [`domain::ExportError::exit_code`].
//!
//! ## Logging
//!
//! All diagnostics go through `tracing`. At the default `debug` level the
//! eligible identifiers and each event's requested instruments are logged
//! before the corresponding export.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
