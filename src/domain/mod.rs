//! Domain models and types for redcap-export.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`RecordId`], [`EventName`], [`InstrumentName`], [`FieldName`])
//! - **Tabular data** ([`RecordTable`]) as exchanged with REDCap and written to disk
//! - **Error types** ([`ExportError`], [`RedcapError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ExportError>`]:
//!
//! ```rust
//! use redcap_export::domain::{EventName, ExportError, Result};
//!
//! fn example() -> Result<EventName> {
//!     EventName::new("baseline_arm_1").map_err(ExportError::Validation)
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod result;
pub mod table;

// Re-export commonly used types for convenience
pub use errors::{ExportError, RedcapError};
pub use ids::{EventName, FieldName, InstrumentName, RecordId};
pub use result::Result;
pub use table::RecordTable;
