//! Instrument selection list
//!
//! The selection file is a CSV with at least the columns `instrument_name`
//! and `download`. An instrument is exported when its `download` cell holds
//! any non-blank value.
//!
//! ```text
//! instrument_name,download,notes
//! demographics,x,
//! vitals,,not needed
//! adverse_events,yes,
//! ```

use crate::domain::{ExportError, InstrumentName, Result};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const INSTRUMENT_COLUMN: &str = "instrument_name";
const DOWNLOAD_COLUMN: &str = "download";

/// Load the set of instruments marked for download
///
/// # Errors
///
/// Returns [`ExportError::Selection`] if the file is missing, is not valid
/// CSV, or lacks a required column.
pub fn load_selection(path: &Path) -> Result<BTreeSet<InstrumentName>> {
    let file = File::open(path).map_err(|e| {
        ExportError::Selection(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let selected = parse_selection(file)
        .map_err(|e| ExportError::Selection(format!("{}: {}", path.display(), e)))?;

    tracing::debug!(
        path = %path.display(),
        instruments = ?selected.iter().map(InstrumentName::as_str).collect::<Vec<_>>(),
        "Forms to download"
    );

    Ok(selected)
}

/// Parse a selection list from any reader
///
/// Rows with a blank `instrument_name` or `download` cell are dropped; row
/// order does not matter.
pub fn parse_selection<R: Read>(reader: R) -> std::result::Result<BTreeSet<InstrumentName>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(|e| e.to_string())?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}') == name)
            .ok_or_else(|| format!("missing required column '{name}'"))
    };
    let instrument_idx = column(INSTRUMENT_COLUMN)?;
    let download_idx = column(DOWNLOAD_COLUMN)?;

    let mut selected = BTreeSet::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| format!("row {}: {}", line + 2, e))?;

        let instrument = record.get(instrument_idx).unwrap_or("");
        let download = record.get(download_idx).unwrap_or("");
        if download.is_empty() {
            continue;
        }

        if let Ok(name) = InstrumentName::new(instrument) {
            selected.insert(name);
        }
    }

    Ok(selected)
}
