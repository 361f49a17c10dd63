//! Timeline reader: turns the raw audit log for a claim into a
//! human-readable history.
//!
//! Reads are enrichment-only. Actor ids resolve to display names, and
//! `area_changed` payloads additionally pick up area and employee names
//! alongside the original ids. Lookups are cached per call; the cache is
//! never shared across calls.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::event::{ClaimEvent, EventDetails};
use crate::store::Store;

/// Per-call lookup cache over the entity tables.
struct NameCache<'a> {
    store: &'a Store,
    users: HashMap<i64, Option<String>>,
    areas: HashMap<i64, Option<String>>,
}

impl<'a> NameCache<'a> {
    fn new(store: &'a Store) -> Self {
        Self {
            store,
            users: HashMap::new(),
            areas: HashMap::new(),
        }
    }

    fn user_name(&mut self, user_id: i64) -> Result<Option<String>> {
        if let Some(cached) = self.users.get(&user_id) {
            return Ok(cached.clone());
        }
        let name = self
            .store
            .get_user(user_id)?
            .map(|user| user.display_name().to_string());
        self.users.insert(user_id, name.clone());
        Ok(name)
    }

    fn area_name(&mut self, area_id: i64) -> Result<Option<String>> {
        if let Some(cached) = self.areas.get(&area_id) {
            return Ok(cached.clone());
        }
        let name = self.store.get_area(area_id)?.map(|area| area.name);
        self.areas.insert(area_id, name.clone());
        Ok(name)
    }
}

/// The enriched event history for a claim, oldest first.
///
/// When `public_only` is set, the list is filtered to the public action set
/// after enrichment (the client-facing subset of the timeline).
///
/// # Errors
///
/// Returns [`Error::ClaimNotFound`] if the claim is absent, or a store
/// error if a lookup fails.
pub fn list_events(store: &Store, claim_id: i64, public_only: bool) -> Result<Vec<ClaimEvent>> {
    if store.get_claim(claim_id)?.is_none() {
        return Err(Error::ClaimNotFound { claim_id });
    }

    let mut cache = NameCache::new(store);
    let mut events = store.query_events(claim_id, false)?;
    for event in &mut events {
        enrich(event, &mut cache)?;
    }

    if public_only {
        events.retain(|event| event.action.is_public());
    }
    Ok(events)
}

fn enrich(event: &mut ClaimEvent, cache: &mut NameCache<'_>) -> Result<()> {
    if let Some(actor_id) = event.actor_id {
        event.actor_name = cache.user_name(actor_id)?;
    }
    if let EventDetails::AreaChanged(details) = &mut event.details {
        if let Some(from) = details.from {
            details.from_area_name = cache.area_name(from)?;
        }
        if let Some(to) = details.to {
            details.to_area_name = cache.area_name(to)?;
        }
        details.employee_name = cache.user_name(details.employee_id)?;
    }
    Ok(())
}
