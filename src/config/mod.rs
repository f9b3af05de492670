//! Configuration management for redcap-export.
//!
//! Settings come from environment variables, optionally layered over a TOML
//! file. A `.env` file in the working directory is loaded by the binary
//! before any of this runs.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use redcap_export::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // REDCAP_API_URL and REDCAP_API_TOKEN must be set
//! let config = load_config(None)?;
//! println!("REDCap API: {}", config.redcap.api_url);
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Variables
//!
//! | Name | Meaning |
//! |---|---|
//! | `REDCAP_API_URL` | REDCap API endpoint (required) |
//! | `REDCAP_API_TOKEN` | Project API token (required) |
//! | `REDCAP_FILTER_LOGIC` | Filter logic; unset or blank exports every record |
//! | `REDCAP_ID_FIELD` | Identifier field, default the first field of the data dictionary |
//! | `REDCAP_FILTER_EVENT` | Event the filter is evaluated in, default the first event |
//! | `REDCAP_TIMEOUT_SECONDS` | Request timeout |
//! | `REDCAP_EXPORT_LOG_LEVEL` | trace, debug, info, warn, error (default debug) |
//! | `REDCAP_EXPORT_LOG_DIR` | Also write JSON logs to this directory |
//! | `REDCAP_EXPORT_DRY_RUN` | `true` to plan without exporting |
//!
//! # Example Configuration File
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [redcap]
//! api_url = "https://redcap.example.edu/api/"
//! api_token = "${REDCAP_API_TOKEN}"
//! filter_logic = "[enrolled] = '1'"
//!
//! [logging]
//! local_enabled = true
//! local_path = "/var/log/redcap-export"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_with};
pub use schema::{AppConfig, ApplicationConfig, LoggingConfig, RedcapConfig};
pub use secret::{secret_string, SecretString, SecretValue};
