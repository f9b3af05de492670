//! Per-event export
//!
//! Each event gets one record export, limited to the eligible records and to
//! the selected instruments the event actually has, written to
//! `<out_dir>/<event>.csv`. Events are processed one after another and the
//! first failure stops the run; files already written stay on disk.

use super::summary::{EventExport, ExportSummary};
use crate::adapters::redcap::{RecordRequest, RedcapApi};
use crate::core::eligibility::EligibleRecords;
use crate::core::form_events::FormEventMap;
use crate::domain::{EventName, ExportError, InstrumentName, RecordTable, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Run-wide export switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Plan and log each event without exporting data or writing files
    pub dry_run: bool,
}

/// Output file for `event`
///
/// # Errors
///
/// Rejects event names that would escape `out_dir`.
pub fn output_path(out_dir: &Path, event: &EventName) -> Result<PathBuf> {
    let name = event.as_str();
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(ExportError::Validation(format!(
            "Event name '{name}' cannot be used as a file name"
        )));
    }
    Ok(out_dir.join(format!("{name}.csv")))
}

/// Record export for one event
///
/// The identifier field is always requested so every file carries it, and an
/// event with no selected instruments yields identifier-only rows. Returns
/// `None` when there are no eligible records: an empty `records` list would
/// make REDCap return every record.
pub fn event_request(
    eligible: &EligibleRecords,
    event: &EventName,
    instruments: &BTreeSet<InstrumentName>,
) -> Option<RecordRequest> {
    if eligible.is_empty() {
        return None;
    }

    Some(
        RecordRequest::new()
            .records(eligible.ids().iter().cloned())
            .fields([eligible.id_field().clone()])
            .forms(instruments.iter().cloned())
            .events([event.clone()])
            .export_survey_fields(false)
            .export_checkbox_labels(true),
    )
}

/// Export one event to its CSV file
pub async fn export_event(
    api: &dyn RedcapApi,
    eligible: &EligibleRecords,
    event: &EventName,
    instruments: BTreeSet<InstrumentName>,
    out_dir: &Path,
    options: ExportOptions,
) -> Result<EventExport> {
    let path = output_path(out_dir, event)?;

    tracing::debug!(
        event = %event,
        instruments = ?instruments.iter().map(InstrumentName::as_str).collect::<Vec<_>>(),
        path = %path.display(),
        "Event {event}: Downloading"
    );

    if options.dry_run {
        return Ok(EventExport {
            event: event.clone(),
            instruments,
            path,
            rows: 0,
            columns: 0,
            written: false,
        });
    }

    let table = match event_request(eligible, event, &instruments) {
        Some(request) => api.export_records(&request).await?,
        None => {
            tracing::warn!(event = %event, "No eligible records, writing header only");
            RecordTable::header_only(vec![eligible.id_field().to_string()])
        }
    };

    table.write_to_path(&path)?;

    tracing::info!(
        event = %event,
        path = %path.display(),
        rows = table.row_count(),
        "Wrote event file"
    );

    Ok(EventExport {
        event: event.clone(),
        instruments,
        path,
        rows: table.row_count(),
        columns: table.column_count(),
        written: true,
    })
}

/// Export every event in `form_events` to `out_dir`
///
/// # Errors
///
/// Stops at the first event whose export or file write fails.
pub async fn export_all(
    api: &dyn RedcapApi,
    eligible: &EligibleRecords,
    selected: &BTreeSet<InstrumentName>,
    form_events: &FormEventMap,
    out_dir: &Path,
    options: ExportOptions,
) -> Result<ExportSummary> {
    let mut summary = ExportSummary::new(eligible.len(), options.dry_run);

    for event in form_events.events() {
        let instruments = form_events.instruments_to_download(event, selected);
        let export = export_event(api, eligible, event, instruments, out_dir, options).await?;
        summary.add_event(export);
    }

    Ok(summary)
}
