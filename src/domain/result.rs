//! Result type alias for redcap-export

use super::errors::ExportError;

/// Result type alias for redcap-export operations
///
/// # Examples
///
/// ```
/// use redcap_export::domain::result::Result;
/// use redcap_export::domain::errors::ExportError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ExportError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ExportError>;
