//! Typed entity records for the claimdesk store.
//!
//! Each entity is a tagged struct with field-level types (no open maps).
//! Enums carry their canonical snake_case string form for storage and
//! display; parsing failures surface as [`ParseEnumError`].

pub mod area;
pub mod claim;
pub mod feedback;
pub mod project;
pub mod user;

use std::fmt;

/// Error returned when parsing an unknown enum value string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    /// The unrecognised input string.
    pub raw: String,
    /// Comma-separated list of accepted values.
    pub expected: &'static str,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown value '{}': expected one of {}",
            self.raw, self.expected
        )
    }
}

impl std::error::Error for ParseEnumError {}
