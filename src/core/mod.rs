//! Core export logic.
//!
//! # Modules
//!
//! - [`eligibility`] - Resolve the records matching the filter logic
//! - [`selection`] - Read the instrument selection list
//! - [`form_events`] - Group the form-event mapping by event
//! - [`export`] - Per-event export, coordination, and reporting
//!
//! # Export Workflow
//!
//! 1. **Resolve**: Export the identifier field in the anchor event with the filter applied
//! 2. **Select**: Read which instruments are marked for download
//! 3. **Map**: Fetch which instruments each event has
//! 4. **Export**: For each event, export the eligible records for the selected
//!    instruments it has and write `<out_dir>/<event>.csv`
//! 5. **Report**: Log and print the export summary
//!
//! # Example
//!
//! ```rust,no_run
//! use redcap_export::adapters::redcap::RedcapClient;
//! use redcap_export::config::load_config;
//! use redcap_export::core::export::ExportCoordinator;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config(None)?;
//! let client = Arc::new(RedcapClient::new(&config.redcap)?);
//!
//! let coordinator = ExportCoordinator::new(&config, client)?;
//! let summary = coordinator
//!     .execute_export(Path::new("instruments.csv"), Path::new("out"))
//!     .await?;
//!
//! println!("Files written: {}", summary.files_written());
//! # Ok(())
//! # }
//! ```

pub mod eligibility;
pub mod export;
pub mod form_events;
pub mod selection;
