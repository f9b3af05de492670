//! External system adapters
//!
//! - [`redcap`] - REDCap API access (data dictionary, events, instrument-event
//!   mapping, record export)

pub mod redcap;
