//! REDCap adapter implementation
//!
//! This module provides the REDCap API trait, its HTTP client and the API models.

pub mod api;
pub mod client;
pub mod models;

#[cfg(test)]
pub(crate) mod testing;

pub use api::RedcapApi;
pub use client::RedcapClient;
pub use models::{Event, FieldMetadata, FormEventMapping, RecordRequest};
