//! Export command implementation

use super::Cli;
use crate::adapters::redcap::RedcapClient;
use crate::config::{load_config, AppConfig};
use crate::core::export::{ExportCoordinator, ExportSummary};
use crate::domain::InstrumentName;
use crate::log_error_with_context;
use crate::logging::init_logging;
use std::sync::Arc;

/// Load configuration, set up logging, and run the export
///
/// Returns the process exit code: 0 on success, otherwise the code of the
/// failing error category.
pub async fn run(cli: &Cli) -> anyhow::Result<i32> {
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => apply_overrides(config, cli),
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return Ok(e.exit_code());
        }
    };

    let _guard = match init_logging(&config.application.log_level, &config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return Ok(e.exit_code());
        }
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "redcap-export");

    let client = match RedcapClient::new(&config.redcap) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            log_error_with_context!(&e, "Failed to create REDCap client");
            eprintln!("Failed to initialize export: {e}");
            return Ok(e.exit_code());
        }
    };

    let coordinator = match ExportCoordinator::new(&config, client) {
        Ok(coordinator) => coordinator,
        Err(e) => {
            log_error_with_context!(&e, "Invalid export options");
            eprintln!("Failed to initialize export: {e}");
            return Ok(e.exit_code());
        }
    };

    if config.application.dry_run {
        println!("🔍 DRY RUN MODE - No records will be exported and no files written");
        println!();
    }

    match coordinator
        .execute_export(&cli.selection_file, &cli.out_dir)
        .await
    {
        Ok(summary) => {
            print_summary(&summary);
            Ok(0)
        }
        Err(e) => {
            log_error_with_context!(&e, "Export failed");
            eprintln!("Export failed: {e}");
            Ok(e.exit_code())
        }
    }
}

fn apply_overrides(mut config: AppConfig, cli: &Cli) -> AppConfig {
    if let Some(level) = &cli.log_level {
        config.application.log_level = level.clone();
    }
    if cli.dry_run {
        config.application.dry_run = true;
    }
    config
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("📊 Export Summary:");
    println!("  Eligible records: {}", summary.eligible_records);
    println!("  Events: {}", summary.events.len());
    println!("  Files written: {}", summary.files_written());
    println!("  Rows written: {}", summary.total_rows());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    for export in &summary.events {
        let instruments = export
            .instruments
            .iter()
            .map(InstrumentName::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let instruments = if instruments.is_empty() {
            "(identifier only)".to_string()
        } else {
            instruments
        };

        if export.written {
            println!(
                "  {} -> {} ({} rows): {}",
                export.event,
                export.path.display(),
                export.rows,
                instruments
            );
        } else {
            println!(
                "  {} -> {} (planned): {}",
                export.event,
                export.path.display(),
                instruments
            );
        }
    }
    println!();

    if summary.dry_run {
        println!("✅ Dry run completed!");
    } else {
        println!("✅ Export completed successfully!");
    }
}
