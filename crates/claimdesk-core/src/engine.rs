//! Claim lifecycle engine.
//!
//! Validates a sparse change-set against the business rules, stages the
//! snapshot update, derives the audit events the change produces, and writes
//! both inside one transaction. Rule evaluation order matters and is fixed:
//! closed-claim guard, status, priority, area, sub-area.

use tracing::info;

use crate::error::{Error, Result};
use crate::event::details::{
    AreaChangedDetails, CommentDetails, CreatedDetails, PriorityChangedDetails,
    StatusChangedDetails, SubAreaChangedDetails,
};
use crate::event::{ActionLoggedDetails, EventDetails, Visibility};
use crate::model::claim::{Attachment, Claim, Priority, Severity, Status};
use crate::model::user::{Role, User};
use crate::store::entities::{ClaimUpdates, NewClaim};
use crate::store::events::NewEvent;
use crate::store::{Store, now_us};

/// Client-supplied fields for a new claim.
#[derive(Debug, Clone)]
pub struct ClaimDraft {
    pub project_id: i64,
    pub claim_type: String,
    pub severity: Option<Severity>,
    pub description: String,
    pub sub_area: Option<String>,
    pub attachment: Option<Attachment>,
}

/// A sparse set of requested changes. `None` means "leave alone"; the
/// double-`Option` fields can also request an explicit clear.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub area_id: Option<Option<i64>>,
    pub sub_area: Option<Option<String>>,
    /// Justification for re-routing an already-assigned claim.
    pub reason: Option<String>,
    /// Required when `status` targets [`Status::Resolved`].
    pub resolution_description: Option<String>,
}

impl ChangeSet {
    /// Whether the set requests no change at all. `reason` and
    /// `resolution_description` are companions to other fields, not changes
    /// in their own right.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.area_id.is_none()
            && self.sub_area.is_none()
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

/// Register a new claim in intake state, appending its `created` event.
///
/// Only clients open claims; the `created` audit record always carries
/// `actor_role = client`.
///
/// # Errors
///
/// Returns [`Error::ClientRequired`] for a non-client actor, or a store
/// error if either write fails.
pub fn create_claim(store: &Store, actor: &User, draft: ClaimDraft) -> Result<Claim> {
    if actor.role != Role::Client {
        return Err(Error::ClientRequired);
    }
    let claim = store.in_write_txn(|| {
        let claim = store.insert_claim(&NewClaim {
            project_id: draft.project_id,
            claim_type: draft.claim_type,
            severity: draft.severity,
            description: draft.description,
            sub_area: draft.sub_area,
            attachment: draft.attachment,
            created_by: actor.id,
        })?;
        store.append_event(&NewEvent {
            claim_id: claim.id,
            actor_id: Some(actor.id),
            actor_role: actor.role,
            visibility: Visibility::Public,
            details: EventDetails::Created(CreatedDetails {
                status: claim.status,
            }),
            created_at_us: claim.created_at_us,
        })?;
        Ok(claim)
    })?;
    info!(claim_id = claim.id, actor_id = actor.id, "created claim");
    Ok(claim)
}

/// Validate and apply a change-set to a claim.
///
/// An empty change-set is a no-op returning the unmodified snapshot, even
/// for a resolved claim. Any requested change against a resolved claim
/// fails with [`Error::ClaimClosed`].
///
/// # Errors
///
/// See the lifecycle rules: [`Error::ClaimClosed`],
/// [`Error::InvalidTransition`], [`Error::MissingResolution`],
/// [`Error::AreaUnavailable`], [`Error::ReasonRequired`], plus
/// [`Error::ClaimNotFound`] and store errors.
pub fn apply_transition(
    store: &Store,
    actor: &User,
    claim_id: i64,
    changes: &ChangeSet,
) -> Result<Claim> {
    let claim = store
        .get_claim(claim_id)?
        .ok_or(Error::ClaimNotFound { claim_id })?;

    if changes.is_empty() {
        return Ok(claim);
    }
    if claim.status == Status::Resolved {
        return Err(Error::ClaimClosed);
    }

    let stamp = now_us();
    let mut updates = ClaimUpdates::default();
    let mut details: Vec<EventDetails> = Vec::new();

    // Rule order: status, priority, area, sub-area. A same-state status
    // request is a permitted no-op producing no event.
    if let Some(target) = changes.status {
        if target != claim.status {
            if !claim.status.can_transition_to(target) {
                return Err(Error::InvalidTransition {
                    from: claim.status,
                    to: target,
                });
            }
            if target == Status::Resolved {
                let resolution = non_blank(changes.resolution_description.as_deref())
                    .ok_or(Error::MissingResolution)?;
                updates.resolution_description = Some(resolution.to_string());
                updates.resolved_at_us = Some(stamp);
            }
            updates.status = Some(target);
            details.push(EventDetails::StatusChanged(StatusChangedDetails {
                from: claim.status,
                to: target,
            }));
        }
    }

    if let Some(priority) = changes.priority {
        updates.priority = Some(priority);
        details.push(EventDetails::PriorityChanged(PriorityChangedDetails {
            from: claim.priority,
            to: priority,
        }));
    }

    if let Some(target_area) = changes.area_id {
        if let Some(area_id) = target_area {
            let available = store
                .get_area(area_id)?
                .is_some_and(|area| area.is_active);
            if !available {
                return Err(Error::AreaUnavailable { area_id });
            }
            let rerouting = claim.area_id.is_some_and(|old| old != area_id);
            if rerouting && non_blank(changes.reason.as_deref()).is_none() {
                return Err(Error::ReasonRequired);
            }
        }
        updates.area_id = Some(target_area);
        details.push(EventDetails::AreaChanged(AreaChangedDetails {
            from: claim.area_id,
            to: target_area,
            reason: non_blank(changes.reason.as_deref()).map(String::from),
            employee_id: actor.id,
            from_area_name: None,
            to_area_name: None,
            employee_name: None,
        }));
    }

    if let Some(target_sub_area) = &changes.sub_area {
        updates.sub_area = Some(target_sub_area.clone());
        details.push(EventDetails::SubAreaChanged(SubAreaChangedDetails {
            from: claim.sub_area.clone(),
            to: target_sub_area.clone(),
        }));
    }

    if updates.is_empty() {
        return Ok(claim);
    }

    store.in_write_txn(|| {
        store.persist_claim(claim_id, &updates)?;
        for detail in &details {
            let action = detail.action();
            store.append_event(&NewEvent {
                claim_id,
                actor_id: Some(actor.id),
                actor_role: actor.role,
                visibility: if action.is_public() {
                    Visibility::Public
                } else {
                    Visibility::Internal
                },
                details: detail.clone(),
                created_at_us: stamp,
            })?;
        }
        Ok(())
    })?;

    info!(
        claim_id,
        actor_id = actor.id,
        events = details.len(),
        "applied claim transition"
    );
    store
        .get_claim(claim_id)?
        .ok_or(Error::ClaimNotFound { claim_id })
}

/// Append an internal `comment` event. Does not touch the snapshot and
/// bypasses the transition validator; the claim only has to exist.
///
/// # Errors
///
/// Returns [`Error::ClaimNotFound`] if the claim is absent.
pub fn add_claim_comment(store: &Store, actor: &User, claim_id: i64, comment: &str) -> Result<i64> {
    require_claim(store, claim_id)?;
    store.append_event(&NewEvent {
        claim_id,
        actor_id: Some(actor.id),
        actor_role: actor.role,
        visibility: Visibility::Internal,
        details: EventDetails::Comment(CommentDetails {
            comment: comment.to_string(),
        }),
        created_at_us: now_us(),
    })
}

/// Append an internal `action_logged` event describing work performed.
///
/// # Errors
///
/// Returns [`Error::MissingDescription`] on a blank description and
/// [`Error::ClaimNotFound`] if the claim is absent.
pub fn add_claim_action(
    store: &Store,
    actor: &User,
    claim_id: i64,
    description: &str,
) -> Result<i64> {
    let description = non_blank(Some(description)).ok_or(Error::MissingDescription)?;
    require_claim(store, claim_id)?;
    store.append_event(&NewEvent {
        claim_id,
        actor_id: Some(actor.id),
        actor_role: actor.role,
        visibility: Visibility::Internal,
        details: EventDetails::ActionLogged(ActionLoggedDetails {
            description: description.to_string(),
        }),
        created_at_us: now_us(),
    })
}

fn require_claim(store: &Store, claim_id: i64) -> Result<()> {
    if store.get_claim(claim_id)?.is_none() {
        return Err(Error::ClaimNotFound { claim_id });
    }
    Ok(())
}
