//! Typed details payloads for each audit action.
//!
//! Each action has a corresponding struct defining its JSON payload schema.
//! The discriminant is external (the event's `action` column), so
//! deserialization goes through [`EventDetails::deserialize_for`].
//!
//! The `*_name` fields on [`AreaChangedDetails`] are never persisted by the
//! engine; the timeline reader injects them at read time without removing
//! the original id fields.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::claim::{Priority, Status};

use super::action::Action;

/// Typed payload for an audit event. The discriminant comes from [`Action`],
/// not from the JSON itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDetails {
    /// Payload for `created`.
    Created(CreatedDetails),
    /// Payload for `status_changed`.
    StatusChanged(StatusChangedDetails),
    /// Payload for `priority_changed`.
    PriorityChanged(PriorityChangedDetails),
    /// Payload for `area_changed`.
    AreaChanged(AreaChangedDetails),
    /// Payload for `sub_area_changed`.
    SubAreaChanged(SubAreaChangedDetails),
    /// Payload for `comment`.
    Comment(CommentDetails),
    /// Payload for `action_logged`.
    ActionLogged(ActionLoggedDetails),
}

impl EventDetails {
    /// Deserialize a JSON string into the correct variant for the given
    /// action.
    ///
    /// # Errors
    ///
    /// Returns a [`DetailsParseError`] if the JSON is malformed or does not
    /// match the expected schema for the action.
    pub fn deserialize_for(action: Action, json: &str) -> Result<Self, DetailsParseError> {
        let result = match action {
            Action::Created => serde_json::from_str::<CreatedDetails>(json).map(Self::Created),
            Action::StatusChanged => {
                serde_json::from_str::<StatusChangedDetails>(json).map(Self::StatusChanged)
            }
            Action::PriorityChanged => {
                serde_json::from_str::<PriorityChangedDetails>(json).map(Self::PriorityChanged)
            }
            Action::AreaChanged => {
                serde_json::from_str::<AreaChangedDetails>(json).map(Self::AreaChanged)
            }
            Action::SubAreaChanged => {
                serde_json::from_str::<SubAreaChangedDetails>(json).map(Self::SubAreaChanged)
            }
            Action::Comment => serde_json::from_str::<CommentDetails>(json).map(Self::Comment),
            Action::ActionLogged => {
                serde_json::from_str::<ActionLoggedDetails>(json).map(Self::ActionLogged)
            }
        };

        result.map_err(|source| DetailsParseError { action, source })
    }

    /// The action tag this payload belongs to.
    #[must_use]
    pub const fn action(&self) -> Action {
        match self {
            Self::Created(_) => Action::Created,
            Self::StatusChanged(_) => Action::StatusChanged,
            Self::PriorityChanged(_) => Action::PriorityChanged,
            Self::AreaChanged(_) => Action::AreaChanged,
            Self::SubAreaChanged(_) => Action::SubAreaChanged,
            Self::Comment(_) => Action::Comment,
            Self::ActionLogged(_) => Action::ActionLogged,
        }
    }

    /// Serialize the payload to a JSON string for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the inner struct fails to serialize (should not
    /// happen with well-formed data).
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Created(d) => serde_json::to_string(d),
            Self::StatusChanged(d) => serde_json::to_string(d),
            Self::PriorityChanged(d) => serde_json::to_string(d),
            Self::AreaChanged(d) => serde_json::to_string(d),
            Self::SubAreaChanged(d) => serde_json::to_string(d),
            Self::Comment(d) => serde_json::to_string(d),
            Self::ActionLogged(d) => serde_json::to_string(d),
        }
    }
}

impl Serialize for EventDetails {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Created(d) => d.serialize(serializer),
            Self::StatusChanged(d) => d.serialize(serializer),
            Self::PriorityChanged(d) => d.serialize(serializer),
            Self::AreaChanged(d) => d.serialize(serializer),
            Self::SubAreaChanged(d) => d.serialize(serializer),
            Self::Comment(d) => d.serialize(serializer),
            Self::ActionLogged(d) => d.serialize(serializer),
        }
    }
}

/// Error returned when deserializing an event's details payload fails.
#[derive(Debug)]
pub struct DetailsParseError {
    /// The action whose payload was being deserialized.
    pub action: Action,
    /// The underlying JSON parse error.
    pub source: serde_json::Error,
}

impl fmt::Display for DetailsParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} details payload: {}", self.action, self.source)
    }
}

impl std::error::Error for DetailsParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

// ---------------------------------------------------------------------------
// Payload structs — one per action
// ---------------------------------------------------------------------------

/// Payload for `created`: the status the claim entered the system with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedDetails {
    pub status: Status,
}

/// Payload for `status_changed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangedDetails {
    pub from: Status,
    pub to: Status,
}

/// Payload for `priority_changed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityChangedDetails {
    pub from: Priority,
    pub to: Priority,
}

/// Payload for `area_changed`.
///
/// `from`/`to` hold area ids (absent when the claim was/becomes unassigned).
/// The `*_name` fields are read-side enrichment only; the engine writes them
/// as `None` and they are skipped during persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaChangedDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// The staff member that performed the reassignment.
    pub employee_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_area_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_area_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
}

/// Payload for `sub_area_changed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubAreaChangedDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

/// Payload for `comment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentDetails {
    pub comment: String,
}

/// Payload for `action_logged`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLoggedDetails {
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_for_dispatches_on_action() {
        let details =
            EventDetails::deserialize_for(Action::StatusChanged, r#"{"from":"intake","to":"in_progress"}"#)
                .expect("valid payload");
        assert_eq!(
            details,
            EventDetails::StatusChanged(StatusChangedDetails {
                from: Status::Intake,
                to: Status::InProgress,
            })
        );
        assert_eq!(details.action(), Action::StatusChanged);
    }

    #[test]
    fn deserialize_for_rejects_schema_mismatch() {
        let err = EventDetails::deserialize_for(Action::Comment, r#"{"body":"hi"}"#).unwrap_err();
        assert_eq!(err.action, Action::Comment);
        assert!(err.to_string().contains("comment details"));
    }

    #[test]
    fn area_changed_names_are_skipped_until_enriched() {
        let details = AreaChangedDetails {
            from: Some(1),
            to: Some(2),
            reason: Some("specialist team".into()),
            employee_id: 9,
            from_area_name: None,
            to_area_name: None,
            employee_name: None,
        };
        let json = serde_json::to_string(&details).expect("serialize");
        assert!(!json.contains("from_area_name"));
        assert!(!json.contains("employee_name"));

        let enriched = AreaChangedDetails {
            to_area_name: Some("Networks".into()),
            ..details
        };
        let json = serde_json::to_string(&enriched).expect("serialize");
        assert!(json.contains("\"to_area_name\":\"Networks\""));
        // Original id fields survive enrichment.
        assert!(json.contains("\"to\":2"));
    }

    #[test]
    fn area_changed_roundtrips_unassigned_endpoints() {
        let details = AreaChangedDetails {
            from: None,
            to: Some(4),
            reason: None,
            employee_id: 3,
            from_area_name: None,
            to_area_name: None,
            employee_name: None,
        };
        let json = serde_json::to_string(&details).expect("serialize");
        let deser = EventDetails::deserialize_for(Action::AreaChanged, &json).expect("deserialize");
        assert_eq!(deser, EventDetails::AreaChanged(details));
    }
}
