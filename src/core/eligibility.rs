//! Eligible record resolution
//!
//! REDCap can only evaluate filter logic against fields that exist in the
//! event being queried, so the filter is anchored to one event (by default
//! the first, typically enrollment or baseline) and the matching identifiers
//! are then reused for every event's export.

use crate::adapters::redcap::{RecordRequest, RedcapApi};
use crate::config::RedcapConfig;
use crate::domain::{EventName, ExportError, FieldName, RecordId, RedcapError, Result};
use std::collections::HashSet;

/// How to find the identifier field and anchor event, and what to filter by
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EligibilityOptions {
    /// Server-side filter logic; `None` keeps every record
    pub filter_logic: Option<String>,

    /// Identifier field; `None` means the first field of the data dictionary
    pub id_field: Option<FieldName>,

    /// Event to evaluate the filter in; `None` means the first defined event
    pub filter_event: Option<EventName>,
}

impl EligibilityOptions {
    /// Build options from REDCap configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a blank identifier field or event name.
    pub fn from_config(config: &RedcapConfig) -> Result<Self> {
        let id_field = config
            .id_field
            .as_deref()
            .map(FieldName::new)
            .transpose()
            .map_err(ExportError::Configuration)?;
        let filter_event = config
            .filter_event
            .as_deref()
            .map(EventName::new)
            .transpose()
            .map_err(ExportError::Configuration)?;

        Ok(Self {
            filter_logic: config.filter_logic.clone(),
            id_field,
            filter_event,
        })
    }
}

/// Records that passed the filter, in first-seen order without duplicates
#[derive(Debug, Clone, PartialEq)]
pub struct EligibleRecords {
    id_field: FieldName,
    anchor_event: EventName,
    ids: Vec<RecordId>,
}

impl EligibleRecords {
    /// Identifier field the records were resolved with
    pub fn id_field(&self) -> &FieldName {
        &self.id_field
    }

    /// Event the filter was evaluated in
    pub fn anchor_event(&self) -> &EventName {
        &self.anchor_event
    }

    /// Eligible identifiers
    pub fn ids(&self) -> &[RecordId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Identifier field: the configured one, else the first data dictionary field
pub async fn resolve_id_field(
    api: &dyn RedcapApi,
    configured: Option<&FieldName>,
) -> Result<FieldName> {
    if let Some(field) = configured {
        return Ok(field.clone());
    }

    let metadata = api.export_metadata().await?;
    let first = metadata
        .first()
        .ok_or_else(|| RedcapError::EmptyProject("fields in its data dictionary".to_string()))?;

    FieldName::new(first.field_name.as_str())
        .map_err(|e| RedcapError::InvalidResponse(e).into())
}

/// Anchor event: the configured one, else the first defined event
pub async fn resolve_anchor_event(
    api: &dyn RedcapApi,
    configured: Option<&EventName>,
) -> Result<EventName> {
    if let Some(event) = configured {
        return Ok(event.clone());
    }

    let events = api.export_events().await?;
    let first = events
        .first()
        .ok_or_else(|| RedcapError::EmptyProject("events defined".to_string()))?;

    EventName::new(first.unique_event_name.as_str())
        .map_err(|e| RedcapError::InvalidResponse(e).into())
}

/// Resolve the identifiers of every record matching the filter
///
/// Exports only the identifier field, scoped to the anchor event, with the
/// filter applied by REDCap.
///
/// # Errors
///
/// Fails if the project has no fields or no events (when those must be
/// inferred), if REDCap rejects the request, or if the response lacks the
/// identifier column.
pub async fn resolve_eligible_ids(
    api: &dyn RedcapApi,
    options: &EligibilityOptions,
) -> Result<EligibleRecords> {
    let id_field = resolve_id_field(api, options.id_field.as_ref()).await?;
    let anchor_event = resolve_anchor_event(api, options.filter_event.as_ref()).await?;

    tracing::debug!(
        id_field = %id_field,
        anchor_event = %anchor_event,
        filter_logic = options.filter_logic.as_deref().unwrap_or(""),
        "Resolving eligible records"
    );

    let request = RecordRequest::new()
        .fields([id_field.clone()])
        .events([anchor_event.clone()])
        .filter_logic(options.filter_logic.clone());
    let table = api.export_records(&request).await?;

    let column = table.column(id_field.as_str()).ok_or_else(|| {
        RedcapError::InvalidResponse(format!(
            "Record export has no '{id_field}' column"
        ))
    })?;

    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for value in column {
        match RecordId::new(value) {
            Ok(id) => {
                if seen.insert(id.clone()) {
                    ids.push(id);
                }
            }
            Err(_) => tracing::warn!(id_field = %id_field, "Skipping row with blank identifier"),
        }
    }

    tracing::debug!(
        count = ids.len(),
        ids = ?ids.iter().map(RecordId::as_str).collect::<Vec<_>>(),
        "Resolved eligible records"
    );

    Ok(EligibleRecords {
        id_field,
        anchor_event,
        ids,
    })
}
