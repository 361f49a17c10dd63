//! Audit event data model for the claim event log.
//!
//! This module defines the [`ClaimEvent`] record, the [`Action`] tag enum,
//! and the typed details payloads. Events are append-only: once written they
//! are never updated or deleted in normal operation (the timestamp backfill
//! in the store is the single administrative exception, and it never touches
//! `details`).

pub mod action;
pub mod details;

pub use action::{Action, UnknownAction, Visibility};
pub use details::{
    ActionLoggedDetails, AreaChangedDetails, CommentDetails, CreatedDetails, DetailsParseError,
    EventDetails, PriorityChangedDetails, StatusChangedDetails, SubAreaChangedDetails,
};

use serde::{Deserialize, Serialize};

use crate::model::user::Role;

/// One immutable audit record describing a state change or annotation on a
/// claim.
///
/// Events are keyed by claim and ordered by `(created_at_us, id)`; ties in
/// the timestamp fall back to insertion order.
///
/// # Serde
///
/// Custom `Deserialize` uses `action` to drive typed deserialization of the
/// `details` field, since the discriminant is external to the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimEvent {
    /// Store-generated id; also the insertion-order tiebreaker.
    pub id: i64,

    pub claim_id: i64,

    /// The user that caused the event, if any.
    pub actor_id: Option<i64>,

    pub actor_role: Role,

    /// The action tag. Determines the shape of `details`.
    pub action: Action,

    /// Whether the owning client may see this event.
    pub visibility: Visibility,

    /// Typed payload specific to the action.
    pub details: EventDetails,

    pub created_at_us: i64,

    /// Actor display name, injected by the timeline reader. Never persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_name: Option<String>,
}

impl<'de> Deserialize<'de> for ClaimEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        /// Two-pass helper: read `action` first, then use it to deserialize
        /// the details payload.
        #[derive(Deserialize)]
        struct ClaimEventRaw {
            id: i64,
            claim_id: i64,
            actor_id: Option<i64>,
            actor_role: Role,
            action: Action,
            visibility: Visibility,
            details: serde_json::Value,
            created_at_us: i64,
            #[serde(default)]
            actor_name: Option<String>,
        }

        let raw = ClaimEventRaw::deserialize(deserializer)?;
        let details_json = raw.details.to_string();
        let details = EventDetails::deserialize_for(raw.action, &details_json)
            .map_err(serde::de::Error::custom)?;

        Ok(Self {
            id: raw.id,
            claim_id: raw.claim_id,
            actor_id: raw.actor_id,
            actor_role: raw.actor_role,
            action: raw.action,
            visibility: raw.visibility,
            details,
            created_at_us: raw.created_at_us,
            actor_name: raw.actor_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::claim::Status;

    fn sample_event() -> ClaimEvent {
        ClaimEvent {
            id: 1,
            claim_id: 42,
            actor_id: Some(7),
            actor_role: Role::Employee,
            action: Action::StatusChanged,
            visibility: Visibility::Public,
            details: EventDetails::StatusChanged(StatusChangedDetails {
                from: Status::Intake,
                to: Status::InProgress,
            }),
            created_at_us: 1_708_012_200_123_456,
            actor_name: None,
        }
    }

    #[test]
    fn serde_json_roundtrip() {
        let event = sample_event();
        let json = serde_json::to_string(&event).expect("serialize");
        let deser: ClaimEvent = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(event, deser);
    }

    #[test]
    fn actor_name_omitted_until_enriched() {
        let event = sample_event();
        let json = serde_json::to_string(&event).expect("serialize");
        assert!(!json.contains("actor_name"));

        let enriched = ClaimEvent {
            actor_name: Some("Ana Pérez".into()),
            ..event
        };
        let json = serde_json::to_string(&enriched).expect("serialize");
        assert!(json.contains("Ana Pérez"));
    }

    #[test]
    fn deserialize_rejects_mismatched_details() {
        let json = r#"{
            "id": 1,
            "claim_id": 42,
            "actor_id": null,
            "actor_role": "client",
            "action": "status_changed",
            "visibility": "public",
            "details": {"comment": "wrong shape"},
            "created_at_us": 0
        }"#;
        assert!(serde_json::from_str::<ClaimEvent>(json).is_err());
    }
}
