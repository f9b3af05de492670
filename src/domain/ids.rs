//! Domain identifier types with validation
//!
//! Newtype wrappers for the REDCap names the export passes around, so a
//! record identifier can't be handed where an event name is expected.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a new `", stringify!($name), "`, rejecting blank input")]
            pub fn new(value: impl Into<String>) -> Result<Self, String> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(concat!($label, " cannot be empty").to_string());
                }
                Ok(Self(value))
            }

            /// Returns the value as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes self and returns the inner String
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Record identifier, the value of the project's identifier field
    ///
    /// # Examples
    ///
    /// ```
    /// use redcap_export::domain::ids::RecordId;
    /// use std::str::FromStr;
    ///
    /// let id = RecordId::from_str("1001").unwrap();
    /// assert_eq!(id.as_str(), "1001");
    /// ```
    RecordId,
    "Record ID"
);

string_id!(
    /// Unique event name, e.g. `baseline_arm_1`
    ///
    /// Also used as the stem of the output file name.
    EventName,
    "Event name"
);

string_id!(
    /// Instrument (form) name as REDCap reports it, e.g. `demographics`
    InstrumentName,
    "Instrument name"
);

string_id!(
    /// Field (variable) name from the project's data dictionary
    FieldName,
    "Field name"
);
