//! Export coordinator - main orchestrator for the export process
//!
//! Runs the pipeline in a fixed order: eligible records, instrument
//! selection, form-event mapping, per-event export. The selection file is
//! read after the eligible records are resolved so a bad input file aborts
//! before any instrument data is fetched.

use crate::adapters::redcap::RedcapApi;
use crate::config::AppConfig;
use crate::core::eligibility::{resolve_eligible_ids, EligibilityOptions};
use crate::core::export::driver::{export_all, ExportOptions};
use crate::core::export::summary::ExportSummary;
use crate::core::form_events::FormEventMap;
use crate::core::selection::load_selection;
use crate::domain::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Export coordinator
pub struct ExportCoordinator {
    api: Arc<dyn RedcapApi>,
    eligibility: EligibilityOptions,
    options: ExportOptions,
}

impl ExportCoordinator {
    /// Create a coordinator from validated configuration
    pub fn new(config: &AppConfig, api: Arc<dyn RedcapApi>) -> Result<Self> {
        Ok(Self {
            api,
            eligibility: EligibilityOptions::from_config(&config.redcap)?,
            options: ExportOptions {
                dry_run: config.application.dry_run,
            },
        })
    }

    /// Create a coordinator from explicit parts
    pub fn with_options(
        api: Arc<dyn RedcapApi>,
        eligibility: EligibilityOptions,
        options: ExportOptions,
    ) -> Self {
        Self {
            api,
            eligibility,
            options,
        }
    }

    /// Execute the export
    ///
    /// 1. Resolves the eligible record identifiers
    /// 2. Loads the instrument selection from `selection_path`
    /// 3. Fetches the form-event mapping
    /// 4. Exports each event to `<out_dir>/<event>.csv`
    pub async fn execute_export(
        &self,
        selection_path: &Path,
        out_dir: &Path,
    ) -> Result<ExportSummary> {
        let start_time = Instant::now();

        tracing::info!(
            api_url = %self.api.base_url(),
            out_dir = %out_dir.display(),
            dry_run = self.options.dry_run,
            "Starting export process"
        );

        let eligible = resolve_eligible_ids(self.api.as_ref(), &self.eligibility).await?;
        tracing::info!(
            count = eligible.len(),
            anchor_event = %eligible.anchor_event(),
            "Resolved eligible records"
        );

        let selected = load_selection(selection_path)?;
        if selected.is_empty() {
            tracing::warn!(
                path = %selection_path.display(),
                "No instruments marked for download, exporting identifiers only"
            );
        }

        let mapping = self.api.export_form_event_mapping().await?;
        let form_events = FormEventMap::from_mappings(&mapping)?;
        tracing::info!(events = form_events.len(), "Fetched form-event mapping");

        let summary = export_all(
            self.api.as_ref(),
            &eligible,
            &selected,
            &form_events,
            out_dir,
            self.options,
        )
        .await?;

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();

        Ok(summary)
    }
}
