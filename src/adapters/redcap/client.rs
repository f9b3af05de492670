//! HTTP client for the REDCap API
//!
//! Every REDCap API call is a form-encoded POST to one endpoint, with the
//! operation selected by the `content` parameter. Requests are sent once;
//! there is no retry.

use super::api::RedcapApi;
use super::models::{ApiErrorBody, Event, FieldMetadata, FormEventMapping, RecordRequest};
use crate::config::{RedcapConfig, SecretString};
use crate::domain::{ExportError, RecordTable, RedcapError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Handle to one REDCap project
///
/// Built once from validated configuration and passed by reference to
/// everything that needs the project.
///
/// # Example
///
/// ```no_run
/// use redcap_export::adapters::redcap::RedcapClient;
/// use redcap_export::config::load_config;
///
/// # fn example() -> redcap_export::domain::Result<()> {
/// let config = load_config(None)?;
/// let client = RedcapClient::new(&config.redcap)?;
/// # Ok(())
/// # }
/// ```
pub struct RedcapClient {
    api_url: String,
    token: SecretString,
    client: Client,
}

impl RedcapClient {
    /// Create a client for the configured project
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the token is missing or the HTTP
    /// client cannot be built.
    pub fn new(config: &RedcapConfig) -> Result<Self> {
        let token = config.api_token.clone().ok_or_else(|| {
            ExportError::Configuration("REDCAP_API_TOKEN is not set".to_string())
        })?;

        let mut builder = ClientBuilder::new();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder.build().map_err(|e| {
            ExportError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            api_url: config.api_url.clone(),
            token,
            client,
        })
    }

    /// POST `params` plus the token and return the response body
    async fn post(&self, params: Vec<(String, String)>) -> Result<String> {
        let content = params
            .iter()
            .find(|(k, _)| k == "content")
            .map(|(_, v)| v.clone())
            .unwrap_or_default();

        let mut form = Vec::with_capacity(params.len() + 1);
        form.push((
            "token".to_string(),
            self.token.expose_secret().as_ref().to_string(),
        ));
        form.extend(params);

        tracing::trace!(content = %content, url = %self.api_url, "Sending REDCap API request");

        let response = self
            .client
            .post(&self.api_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RedcapError::Timeout(e.to_string())
                } else {
                    RedcapError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RedcapError::InvalidResponse(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            tracing::debug!(
                content = %content,
                status = status.as_u16(),
                message = %message,
                "REDCap API request failed"
            );
            return Err(RedcapError::ApiError {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        Ok(body)
    }

    async fn post_json<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        let body = self
            .post(vec![
                ("content".to_string(), content.to_string()),
                ("format".to_string(), "json".to_string()),
                ("returnFormat".to_string(), "json".to_string()),
            ])
            .await?;

        serde_json::from_str(&body).map_err(|e| {
            RedcapError::InvalidResponse(format!("Unexpected {content} response: {e}")).into()
        })
    }
}

#[async_trait]
impl RedcapApi for RedcapClient {
    async fn export_metadata(&self) -> Result<Vec<FieldMetadata>> {
        let fields: Vec<FieldMetadata> = self.post_json("metadata").await?;
        tracing::debug!(count = fields.len(), "Fetched data dictionary");
        Ok(fields)
    }

    async fn export_events(&self) -> Result<Vec<Event>> {
        let events: Vec<Event> = self.post_json("event").await?;
        tracing::debug!(count = events.len(), "Fetched events");
        Ok(events)
    }

    async fn export_form_event_mapping(&self) -> Result<Vec<FormEventMapping>> {
        let rows: Vec<FormEventMapping> = self.post_json("formEventMapping").await?;
        tracing::debug!(count = rows.len(), "Fetched instrument-event mapping");
        Ok(rows)
    }

    async fn export_records(&self, request: &RecordRequest) -> Result<RecordTable> {
        let body = self.post(request.to_form_params()).await?;

        RecordTable::from_csv_str(&body).map_err(|e| {
            RedcapError::InvalidResponse(format!("Record export is not valid CSV: {e}")).into()
        })
    }

    fn base_url(&self) -> &str {
        &self.api_url
    }
}
