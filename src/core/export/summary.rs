//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::domain::{EventName, InstrumentName};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of one event's export
#[derive(Debug, Clone, PartialEq)]
pub struct EventExport {
    /// Unique event name
    pub event: EventName,

    /// Instruments requested for this event
    pub instruments: BTreeSet<InstrumentName>,

    /// Output file
    pub path: PathBuf,

    /// Data rows written (header excluded)
    pub rows: usize,

    /// Columns written
    pub columns: usize,

    /// False in dry-run mode
    pub written: bool,
}

/// Summary of an export run
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Number of records that passed the filter
    pub eligible_records: usize,

    /// Per-event outcomes, in processing order
    pub events: Vec<EventExport>,

    /// Whether this was a dry run
    pub dry_run: bool,

    /// Duration of the export
    pub duration: Duration,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new(eligible_records: usize, dry_run: bool) -> Self {
        Self {
            eligible_records,
            events: Vec::new(),
            dry_run,
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record one event's outcome
    pub fn add_event(&mut self, export: EventExport) {
        self.events.push(export);
    }

    /// Number of files written
    pub fn files_written(&self) -> usize {
        self.events.iter().filter(|e| e.written).count()
    }

    /// Data rows across all written files
    pub fn total_rows(&self) -> usize {
        self.events.iter().map(|e| e.rows).sum()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            eligible_records = self.eligible_records,
            events = self.events.len(),
            files_written = self.files_written(),
            total_rows = self.total_rows(),
            dry_run = self.dry_run,
            duration_secs = self.duration.as_secs_f64(),
            "Export completed"
        );

        for export in &self.events {
            tracing::debug!(
                event = %export.event,
                path = %export.path.display(),
                rows = export.rows,
                columns = export.columns,
                written = export.written,
                "Event export"
            );
        }
    }
}
