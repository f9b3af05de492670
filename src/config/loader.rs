//! Configuration loader with TOML parsing and environment variable overrides
//!
//! Precedence, lowest first: built-in defaults, the optional TOML file,
//! environment variables. The result is validated before anything touches
//! the network.

use super::schema::AppConfig;
use super::secret::secret_string;
use crate::domain::errors::ExportError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Environment variables recognised by [`load_config`]
pub mod env {
    pub const API_URL: &str = "REDCAP_API_URL";
    pub const API_TOKEN: &str = "REDCAP_API_TOKEN";
    pub const FILTER_LOGIC: &str = "REDCAP_FILTER_LOGIC";
    pub const ID_FIELD: &str = "REDCAP_ID_FIELD";
    pub const FILTER_EVENT: &str = "REDCAP_FILTER_EVENT";
    pub const TIMEOUT_SECONDS: &str = "REDCAP_TIMEOUT_SECONDS";
    pub const LOG_LEVEL: &str = "REDCAP_EXPORT_LOG_LEVEL";
    pub const LOG_DIR: &str = "REDCAP_EXPORT_LOG_DIR";
    pub const DRY_RUN: &str = "REDCAP_EXPORT_DRY_RUN";
}

/// Loads configuration from the process environment and an optional TOML file
///
/// # Errors
///
/// Returns [`ExportError::Configuration`] if the file cannot be read or
/// parsed, a `${VAR}` placeholder is unset, or validation fails (for example
/// when `REDCAP_API_URL` or `REDCAP_API_TOKEN` is missing).
///
/// # Examples
///
/// ```no_run
/// use redcap_export::config::load_config;
///
/// let config = load_config(None).expect("REDCAP_API_URL and REDCAP_API_TOKEN must be set");
/// ```
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    load_config_with(path, |name| std::env::var(name).ok())
}

/// Same as [`load_config`], reading variables through `lookup`
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_config_file(path, &lookup)?,
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, &lookup)?;
    normalize(&mut config);

    config.validate().map_err(|e| {
        ExportError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

fn read_config_file<F>(path: &Path, lookup: &F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if !path.exists() {
        return Err(ExportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ExportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents, lookup)?;

    toml::from_str(&contents)
        .map_err(|e| ExportError::Configuration(format!("Failed to parse TOML: {e}")))
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars<F>(input: &str, lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ExportError::Configuration(e.to_string()))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match lookup(var_name) {
                Some(value) => {
                    processed_line = processed_line.replace(&cap[0], &value);
                }
                None => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ExportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn apply_env_overrides<F>(config: &mut AppConfig, lookup: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup(env::API_URL) {
        config.redcap.api_url = val;
    }
    if let Some(val) = lookup(env::API_TOKEN) {
        config.redcap.api_token = Some(secret_string(val));
    }
    if let Some(val) = lookup(env::FILTER_LOGIC) {
        config.redcap.filter_logic = Some(val);
    }
    if let Some(val) = lookup(env::ID_FIELD) {
        config.redcap.id_field = Some(val);
    }
    if let Some(val) = lookup(env::FILTER_EVENT) {
        config.redcap.filter_event = Some(val);
    }
    if let Some(val) = lookup(env::TIMEOUT_SECONDS) {
        let seconds = val.trim().parse().map_err(|_| {
            ExportError::Configuration(format!(
                "{} must be a whole number of seconds, got '{val}'",
                env::TIMEOUT_SECONDS
            ))
        })?;
        config.redcap.timeout_seconds = Some(seconds);
    }

    if let Some(val) = lookup(env::LOG_LEVEL) {
        config.application.log_level = val;
    }
    if let Some(val) = lookup(env::DRY_RUN) {
        config.application.dry_run =
            matches!(val.trim().to_lowercase().as_str(), "true" | "1" | "yes");
    }
    if let Some(val) = lookup(env::LOG_DIR) {
        config.logging.local_enabled = true;
        config.logging.local_path = val;
    }

    Ok(())
}

/// Blank optional settings count as unset
fn normalize(config: &mut AppConfig) {
    for value in [
        &mut config.redcap.filter_logic,
        &mut config.redcap.id_field,
        &mut config.redcap.filter_event,
    ] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            *value = None;
        }
    }
    config.redcap.api_url = config.redcap.api_url.trim().to_string();
}
