//! In-memory REDCap project for unit tests

use super::api::RedcapApi;
use super::models::{Event, FieldMetadata, FormEventMapping, RecordRequest};
use crate::domain::{RecordTable, RedcapError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

type Row = (String, String, Vec<(String, String)>);

/// Answers record exports the way REDCap does for a flat CSV export:
/// identifier first, then `redcap_event_name`, then the requested fields in
/// data dictionary order.
#[derive(Default)]
pub(crate) struct FakeProject {
    metadata: Vec<FieldMetadata>,
    events: Vec<Event>,
    mapping: Vec<FormEventMapping>,
    rows: Vec<Row>,
    filters: HashMap<String, Vec<String>>,
    failing_event: Option<String>,
    requests: Mutex<Vec<RecordRequest>>,
}

impl FakeProject {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_field(mut self, field: &str, form: &str) -> Self {
        self.metadata.push(FieldMetadata {
            field_name: field.to_string(),
            form_name: form.to_string(),
            field_type: "text".to_string(),
            field_label: field.to_string(),
        });
        self
    }

    pub(crate) fn with_event(mut self, event: &str) -> Self {
        self.events.push(Event {
            unique_event_name: event.to_string(),
            event_name: event.to_string(),
        });
        self
    }

    pub(crate) fn with_form_in_event(mut self, event: &str, form: &str) -> Self {
        self.mapping.push(FormEventMapping {
            unique_event_name: event.to_string(),
            form: form.to_string(),
        });
        self
    }

    pub(crate) fn with_row(mut self, record: &str, event: &str, values: &[(&str, &str)]) -> Self {
        self.rows.push((
            record.to_string(),
            event.to_string(),
            values
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));
        self
    }

    /// Records the filter expression `logic` matches
    pub(crate) fn with_filter(mut self, logic: &str, matching: &[&str]) -> Self {
        self.filters.insert(
            logic.to_string(),
            matching.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub(crate) fn failing_on_event(mut self, event: &str) -> Self {
        self.failing_event = Some(event.to_string());
        self
    }

    pub(crate) fn requests(&self) -> Vec<RecordRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn api_error(message: impl Into<String>) -> crate::domain::ExportError {
        RedcapError::ApiError {
            status: 400,
            message: message.into(),
        }
        .into()
    }
}

#[async_trait]
impl RedcapApi for FakeProject {
    async fn export_metadata(&self) -> Result<Vec<FieldMetadata>> {
        Ok(self.metadata.clone())
    }

    async fn export_events(&self) -> Result<Vec<Event>> {
        Ok(self.events.clone())
    }

    async fn export_form_event_mapping(&self) -> Result<Vec<FormEventMapping>> {
        Ok(self.mapping.clone())
    }

    async fn export_records(&self, request: &RecordRequest) -> Result<RecordTable> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(failing) = &self.failing_event {
            if request.events.iter().any(|e| e.as_str() == failing.as_str()) {
                return Err(Self::api_error(format!("Export of {failing} failed")));
            }
        }

        let allowed = match &request.filter_logic {
            Some(logic) => Some(
                self.filters
                    .get(logic)
                    .ok_or_else(|| Self::api_error("The filter logic is invalid"))?,
            ),
            None => None,
        };

        let id_field = &self.metadata[0].field_name;
        let select_all = request.fields.is_empty() && request.forms.is_empty();
        let mut headers = vec![id_field.clone(), "redcap_event_name".to_string()];
        headers.extend(
            self.metadata
                .iter()
                .skip(1)
                .filter(|f| {
                    select_all
                        || request.fields.iter().any(|n| n.as_str() == f.field_name)
                        || request.forms.iter().any(|n| n.as_str() == f.form_name)
                })
                .map(|f| f.field_name.clone()),
        );

        let rows = self
            .rows
            .iter()
            .filter(|(record, event, _)| {
                (request.records.is_empty()
                    || request.records.iter().any(|r| r.as_str() == record.as_str()))
                    && (request.events.is_empty()
                        || request.events.iter().any(|e| e.as_str() == event.as_str()))
                    && allowed.map_or(true, |ids| ids.contains(record))
            })
            .map(|(record, event, values)| {
                headers
                    .iter()
                    .enumerate()
                    .map(|(i, header)| match i {
                        0 => record.clone(),
                        1 => event.clone(),
                        _ => values
                            .iter()
                            .find(|(k, _)| k == header)
                            .map(|(_, v)| v.clone())
                            .unwrap_or_default(),
                    })
                    .collect()
            })
            .collect();

        RecordTable::new(headers, rows)
    }

    fn base_url(&self) -> &str {
        "memory://redcap"
    }
}
