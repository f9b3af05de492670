//! REDCap API models
//!
//! JSON payloads returned by the metadata, event and form-event mapping
//! exports, plus [`RecordRequest`], which describes one record export.

use crate::domain::{EventName, FieldName, InstrumentName, RecordId};
use serde::{Deserialize, Serialize};

/// One row of the data dictionary (`content=metadata`)
///
/// Rows arrive in data dictionary order, so the first row is the record
/// identifier field in every standard project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMetadata {
    pub field_name: String,
    pub form_name: String,
    #[serde(default)]
    pub field_type: String,
    #[serde(default)]
    pub field_label: String,
}

/// A defined event (`content=event`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub unique_event_name: String,
    #[serde(default)]
    pub event_name: String,
}

/// One instrument designated to one event (`content=formEventMapping`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormEventMapping {
    pub unique_event_name: String,
    pub form: String,
}

/// Error body REDCap sends with non-2xx responses when `returnFormat=json`
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// Parameters of a flat CSV record export (`content=record`)
///
/// Empty lists are omitted from the request; to REDCap an omitted list
/// means "all", so callers must never send an empty `records` list when they
/// mean "none".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordRequest {
    pub records: Vec<RecordId>,
    pub fields: Vec<FieldName>,
    pub forms: Vec<InstrumentName>,
    pub events: Vec<EventName>,
    pub filter_logic: Option<String>,
    pub export_survey_fields: bool,
    pub export_checkbox_labels: bool,
}

impl RecordRequest {
    /// Start an empty request (all records, all fields)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(mut self, records: impl IntoIterator<Item = RecordId>) -> Self {
        self.records = records.into_iter().collect();
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldName>) -> Self {
        self.fields = fields.into_iter().collect();
        self
    }

    pub fn forms(mut self, forms: impl IntoIterator<Item = InstrumentName>) -> Self {
        self.forms = forms.into_iter().collect();
        self
    }

    pub fn events(mut self, events: impl IntoIterator<Item = EventName>) -> Self {
        self.events = events.into_iter().collect();
        self
    }

    pub fn filter_logic(mut self, filter_logic: Option<String>) -> Self {
        self.filter_logic = filter_logic;
        self
    }

    pub fn export_survey_fields(mut self, enabled: bool) -> Self {
        self.export_survey_fields = enabled;
        self
    }

    pub fn export_checkbox_labels(mut self, enabled: bool) -> Self {
        self.export_checkbox_labels = enabled;
        self
    }

    /// Form parameters for the request body, token excluded
    pub fn to_form_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("content".to_string(), "record".to_string()),
            ("format".to_string(), "csv".to_string()),
            ("type".to_string(), "flat".to_string()),
            ("rawOrLabel".to_string(), "raw".to_string()),
            ("rawOrLabelHeaders".to_string(), "raw".to_string()),
            (
                "exportCheckboxLabel".to_string(),
                self.export_checkbox_labels.to_string(),
            ),
            (
                "exportSurveyFields".to_string(),
                self.export_survey_fields.to_string(),
            ),
            ("exportDataAccessGroups".to_string(), "false".to_string()),
            ("returnFormat".to_string(), "json".to_string()),
        ];

        push_array(&mut params, "records", &self.records);
        push_array(&mut params, "fields", &self.fields);
        push_array(&mut params, "forms", &self.forms);
        push_array(&mut params, "events", &self.events);

        if let Some(filter) = &self.filter_logic {
            params.push(("filterLogic".to_string(), filter.clone()));
        }

        params
    }
}

fn push_array<T: AsRef<str>>(params: &mut Vec<(String, String)>, key: &str, values: &[T]) {
    for (i, value) in values.iter().enumerate() {
        params.push((format!("{key}[{i}]"), value.as_ref().to_string()));
    }
}
