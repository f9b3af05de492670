//! Domain error types
//!
//! This module defines the error hierarchy for redcap-export.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main error type
///
/// This is the primary error type used throughout the library. Every error is
/// fatal to the run; the variant decides the process exit code.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// REDCap API errors
    #[error("REDCap error: {0}")]
    Redcap(#[from] RedcapError),

    /// Instrument selection file errors
    #[error("Selection file error: {0}")]
    Selection(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// CSV parsing or writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl ExportError {
    /// Process exit code for this error
    ///
    /// `2` configuration, `3` selection input, `4` remote service, `5` anything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExportError::Configuration(_) => 2,
            ExportError::Selection(_) => 3,
            ExportError::Redcap(_) => 4,
            _ => 5,
        }
    }
}

/// REDCap-specific errors
///
/// Errors that occur when talking to the REDCap API.
/// These errors don't expose the HTTP client's types.
#[derive(Debug, Error)]
pub enum RedcapError {
    /// Failed to reach the server
    #[error("Failed to connect to REDCap: {0}")]
    ConnectionFailed(String),

    /// The request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// The API answered with a non-success status
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// The response body could not be understood
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// The project lacks structure the export relies on (fields, events)
    #[error("Project has no {0}")]
    EmptyProject(String),
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Csv(err.to_string())
    }
}

impl From<toml::de::Error> for ExportError {
    fn from(err: toml::de::Error) -> Self {
        ExportError::Configuration(format!("TOML parse error: {err}"))
    }
}
