//! Action tag enum covering the 7 audit event actions, plus visibility.
//!
//! The string representation is the snake_case tag stored in the audit log
//! and matched by timeline consumers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The 7 actions in the claim audit catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Claim created (the mandatory first event).
    Created,
    /// Lifecycle status moved along the allowed edges.
    StatusChanged,
    /// Priority set by staff.
    PriorityChanged,
    /// Claim routed to a different area (or unassigned).
    AreaChanged,
    /// Free-text sub-area updated.
    SubAreaChanged,
    /// Internal staff comment.
    Comment,
    /// Work performed without changing state or routing.
    ActionLogged,
}

/// Error returned when parsing an unknown action tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction {
    /// The unrecognised input string.
    pub raw: String,
}

impl fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown action '{}': expected one of created, status_changed, \
             priority_changed, area_changed, sub_area_changed, comment, \
             action_logged",
            self.raw
        )
    }
}

impl std::error::Error for UnknownAction {}

impl Action {
    /// All known actions in catalog order.
    pub const ALL: [Self; 7] = [
        Self::Created,
        Self::StatusChanged,
        Self::PriorityChanged,
        Self::AreaChanged,
        Self::SubAreaChanged,
        Self::Comment,
        Self::ActionLogged,
    ];

    /// Return the canonical snake_case tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::StatusChanged => "status_changed",
            Self::PriorityChanged => "priority_changed",
            Self::AreaChanged => "area_changed",
            Self::SubAreaChanged => "sub_area_changed",
            Self::Comment => "comment",
            Self::ActionLogged => "action_logged",
        }
    }

    /// Whether this action belongs to the fixed public subset shown to the
    /// owning client: `created`, `status_changed`, `area_changed`.
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Created | Self::StatusChanged | Self::AreaChanged)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "status_changed" => Ok(Self::StatusChanged),
            "priority_changed" => Ok(Self::PriorityChanged),
            "area_changed" => Ok(Self::AreaChanged),
            "sub_area_changed" => Ok(Self::SubAreaChanged),
            "comment" => Ok(Self::Comment),
            "action_logged" => Ok(Self::ActionLogged),
            _ => Err(UnknownAction { raw: s.to_string() }),
        }
    }
}

// Custom serde: serialize as the snake_case tag string.
impl Serialize for Action {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Whether an event is shown to the owning client or staff-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Internal,
    Public,
}

impl Visibility {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::Public => "public",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = crate::model::ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "internal" => Ok(Self::Internal),
            "public" => Ok(Self::Public),
            _ => Err(crate::model::ParseEnumError {
                raw: s.to_string(),
                expected: "internal, public",
            }),
        }
    }
}
