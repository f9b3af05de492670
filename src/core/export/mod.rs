//! Export orchestration
//!
//! This module provides the per-event export logic, including:
//! - Building the record export for each event
//! - Coordination of the full pipeline
//! - Summary and reporting

pub mod coordinator;
pub mod driver;
pub mod summary;

pub use coordinator::ExportCoordinator;
pub use driver::{event_request, export_all, export_event, output_path, ExportOptions};
pub use summary::{EventExport, ExportSummary};
