//! REDCap API trait definition
//!
//! The export pipeline only talks to REDCap through [`RedcapApi`], so the
//! same code runs against the HTTP client or an in-memory project.

use super::models::{Event, FieldMetadata, FormEventMapping, RecordRequest};
use crate::domain::{RecordTable, Result};
use async_trait::async_trait;

/// Operations the export needs from a REDCap project
///
/// # Example
///
/// ```no_run
/// use redcap_export::adapters::redcap::{RecordRequest, RedcapApi, RedcapClient};
/// use redcap_export::config::load_config;
///
/// # async fn example() -> redcap_export::domain::Result<()> {
/// let config = load_config(None)?;
/// let client = RedcapClient::new(&config.redcap)?;
///
/// let fields = client.export_metadata().await?;
/// let table = client.export_records(&RecordRequest::new()).await?;
/// println!("{} fields, {} rows", fields.len(), table.row_count());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait RedcapApi: Send + Sync {
    /// Data dictionary rows, in data dictionary order
    async fn export_metadata(&self) -> Result<Vec<FieldMetadata>>;

    /// Defined events, in project order
    ///
    /// # Errors
    ///
    /// REDCap rejects this call for classic (non-longitudinal) projects.
    async fn export_events(&self) -> Result<Vec<Event>>;

    /// Instrument-event designations
    async fn export_form_event_mapping(&self) -> Result<Vec<FormEventMapping>>;

    /// Flat record export as text-only CSV
    async fn export_records(&self, request: &RecordRequest) -> Result<RecordTable>;

    /// API endpoint this handle talks to
    fn base_url(&self) -> &str;
}
