//! Configuration schema types
//!
//! The root [`AppConfig`] maps onto the optional TOML file; every field also
//! has an environment variable (see [`crate::config::loader`]).

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// REDCap connection and record filtering
    #[serde(default)]
    pub redcap: RedcapConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.redcap.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Resolve and report the per-event plan without exporting data or writing files
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// REDCap project connection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedcapConfig {
    /// API endpoint, e.g. `https://redcap.example.edu/api/` (`REDCAP_API_URL`)
    #[serde(default)]
    pub api_url: String,

    /// Project API token (`REDCAP_API_TOKEN`)
    #[serde(default)]
    pub api_token: Option<SecretString>,

    /// Server-side filter logic; `None` exports every record (`REDCAP_FILTER_LOGIC`)
    #[serde(default)]
    pub filter_logic: Option<String>,

    /// Identifier field; `None` means the first field of the data dictionary
    #[serde(default)]
    pub id_field: Option<String>,

    /// Event the filter logic is evaluated in; `None` means the first defined event
    #[serde(default)]
    pub filter_event: Option<String>,

    /// Request timeout in seconds; `None` keeps the HTTP client's default
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl RedcapConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.api_url.trim().is_empty() {
            return Err("REDCAP_API_URL is not set (redcap.api_url)".to_string());
        }

        let parsed = url::Url::parse(&self.api_url)
            .map_err(|e| format!("redcap.api_url '{}' is not a valid URL: {e}", self.api_url))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err("redcap.api_url must start with http:// or https://".to_string());
        }

        match &self.api_token {
            None => return Err("REDCAP_API_TOKEN is not set (redcap.api_token)".to_string()),
            Some(token) if token.expose_secret().is_blank() => {
                return Err("redcap.api_token cannot be empty".to_string())
            }
            Some(_) => {}
        }

        if self.timeout_seconds == Some(0) {
            return Err("redcap.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write JSON logs to files under `local_path`
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when file logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "debug".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use test_case::test_case;

    fn valid_redcap() -> RedcapConfig {
        RedcapConfig {
            api_url: "https://redcap.example.edu/api/".to_string(),
            api_token: Some(secret_string("ABCDEF0123456789".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.application.log_level, "debug");
        assert!(!config.application.dry_run);
        assert!(!config.logging.local_enabled);
        assert_eq!(config.logging.local_rotation, "daily");
        assert!(config.redcap.filter_logic.is_none());
    }

    #[test]
    fn test_valid_config() {
        let config = AppConfig {
            redcap: valid_redcap(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_url() {
        let config = RedcapConfig {
            api_url: String::new(),
            ..valid_redcap()
        };
        assert!(config.validate().unwrap_err().contains("REDCAP_API_URL"));
    }

    #[test]
    fn test_missing_token() {
        let config = RedcapConfig {
            api_token: None,
            ..valid_redcap()
        };
        assert!(config.validate().unwrap_err().contains("REDCAP_API_TOKEN"));
    }

    #[test]
    fn test_blank_token() {
        let config = RedcapConfig {
            api_token: Some(secret_string("  ".to_string())),
            ..valid_redcap()
        };
        assert!(config.validate().is_err());
    }

    #[test_case("ftp://redcap.example.edu/api/" ; "wrong scheme")]
    #[test_case("redcap.example.edu/api" ; "relative")]
    #[test_case("not a url" ; "garbage")]
    fn test_invalid_urls(url: &str) {
        let config = RedcapConfig {
            api_url: url.to_string(),
            ..valid_redcap()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = RedcapConfig {
            timeout_seconds: Some(0),
            ..valid_redcap()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let config = ApplicationConfig {
            log_level: "verbose".to_string(),
            dry_run: false,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_rotation() {
        let config = LoggingConfig {
            local_rotation: "weekly".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
