//! Append and read operations for the claim audit log.
//!
//! Events are append-only. The one administrative mutation is
//! [`Store::backfill_event_timestamp`], which exists to repair imported
//! history and never touches the payload.

use rusqlite::{params, types::Type};
use tracing::debug;

use crate::error::{Error, Result};
use crate::event::{Action, ClaimEvent, EventDetails, Visibility};
use crate::model::user::Role;

use super::Store;

/// Fields for one event append. The action tag is derived from the payload.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub claim_id: i64,
    pub actor_id: Option<i64>,
    pub actor_role: Role,
    pub visibility: Visibility,
    pub details: EventDetails,
    pub created_at_us: i64,
}

fn event_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClaimEvent> {
    let actor_role: String = row.get(3)?;
    let action: String = row.get(4)?;
    let visibility: String = row.get(5)?;
    let details_json: String = row.get(6)?;

    let actor_role: Role = actor_role
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
    let action: Action = action
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    let visibility: Visibility = visibility
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;
    let details = EventDetails::deserialize_for(action, &details_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

    Ok(ClaimEvent {
        id: row.get(0)?,
        claim_id: row.get(1)?,
        actor_id: row.get(2)?,
        actor_role,
        action,
        visibility,
        details,
        created_at_us: row.get(7)?,
        actor_name: None,
    })
}

const EVENT_COLS: &str =
    "id, claim_id, actor_id, actor_role, action, visibility, details, created_at_us";

impl Store {
    /// Append one audit event. Callers that also update the claim snapshot
    /// must wrap both writes in [`Store::in_write_txn`].
    ///
    /// # Errors
    ///
    /// Returns a payload error if the details cannot be serialized, or a
    /// store error if the insert fails.
    pub fn append_event(&self, new: &NewEvent) -> Result<i64> {
        let action = new.details.action();
        let details = new.details.to_json_string()?;
        self.conn().execute(
            "INSERT INTO claim_events
                (claim_id, actor_id, actor_role, action, visibility, details, created_at_us)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                new.claim_id,
                new.actor_id,
                new.actor_role.as_str(),
                action.as_str(),
                new.visibility.as_str(),
                details,
                new.created_at_us,
            ],
        )?;
        let id = self.conn().last_insert_rowid();
        debug!(event_id = id, claim_id = new.claim_id, action = action.as_str(), "appended event");
        Ok(id)
    }

    /// All events for a claim in chronological order, ties broken by
    /// insertion order. When `public_only` is set, internal events are
    /// filtered out in the query.
    ///
    /// # Errors
    ///
    /// Returns a store error if the query fails, or a payload error if a
    /// stored details blob no longer matches its action tag.
    pub fn query_events(&self, claim_id: i64, public_only: bool) -> Result<Vec<ClaimEvent>> {
        let sql = if public_only {
            format!(
                "SELECT {EVENT_COLS} FROM claim_events
                 WHERE claim_id = ?1 AND visibility = 'public'
                 ORDER BY created_at_us ASC, id ASC"
            )
        } else {
            format!(
                "SELECT {EVENT_COLS} FROM claim_events
                 WHERE claim_id = ?1
                 ORDER BY created_at_us ASC, id ASC"
            )
        };
        let mut stmt = self.conn().prepare(&sql)?;
        let events = stmt
            .query_map(params![claim_id], event_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(events)
    }

    /// Administrative repair of an event timestamp, for history imported
    /// with a wrong or missing clock. The payload is never touched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EventNotFound`] if the event does not exist.
    pub fn backfill_event_timestamp(&self, event_id: i64, created_at_us: i64) -> Result<()> {
        let changed = self.conn().execute(
            "UPDATE claim_events SET created_at_us = ?1 WHERE id = ?2",
            params![created_at_us, event_id],
        )?;
        if changed == 0 {
            return Err(Error::EventNotFound { event_id });
        }
        debug!(event_id, created_at_us, "backfilled event timestamp");
        Ok(())
    }
}
