//! Directory operations: the admin-facing surface for areas, sub-areas,
//! users, and projects.
//!
//! Plain CRUD goes straight to the store; this module adds the rules that
//! sit above it, notably the employee guard on area deactivation and the
//! membership checks on sub-area edits. Nothing here writes audit events —
//! the event log records claim history only.

use tracing::info;

use crate::error::{Error, Result};
use crate::model::area::{Area, SubArea};
use crate::model::claim::{Claim, Status};
use crate::model::project::Project;
use crate::model::user::{Role, User};
use crate::store::Store;
use crate::store::entities::{ClaimFilter, NewUser};

/// Register a user. Employees attached to an area require that area to
/// exist and be active.
///
/// # Errors
///
/// Returns [`Error::AreaUnavailable`] for a bad area reference and
/// [`Error::DuplicateName`] on an email collision.
pub fn register_user(store: &Store, new: &NewUser) -> Result<User> {
    if new.role == Role::Employee
        && let Some(area_id) = new.area_id
    {
        let available = store.get_area(area_id)?.is_some_and(|area| area.is_active);
        if !available {
            return Err(Error::AreaUnavailable { area_id });
        }
    }
    let user = store.create_user(new)?;
    info!(user_id = user.id, role = user.role.as_str(), "registered user");
    Ok(user)
}

/// Create a project owned by a client.
///
/// # Errors
///
/// Returns [`Error::UserNotFound`] if the client does not exist.
pub fn create_project(
    store: &Store,
    name: &str,
    project_type: &str,
    client_id: i64,
) -> Result<Project> {
    if store.get_user(client_id)?.is_none() {
        return Err(Error::UserNotFound { user_id: client_id });
    }
    store.create_project(name, project_type, client_id)
}

/// Deactivate an area, refusing while active employees are attached.
///
/// # Errors
///
/// Returns [`Error::AreaHasEmployees`] when the guard trips and
/// [`Error::AreaNotFound`] if the area is absent.
pub fn deactivate_area(store: &Store, area_id: i64) -> Result<()> {
    let employees = store.count_active_employees(area_id)?;
    if employees > 0 {
        return Err(Error::AreaHasEmployees { area_id, employees });
    }
    store.set_area_active(area_id, false)?;
    info!(area_id, "deactivated area");
    Ok(())
}

/// Reactivate a previously deactivated area.
///
/// # Errors
///
/// Returns [`Error::AreaNotFound`] if the area is absent.
pub fn reactivate_area(store: &Store, area_id: i64) -> Result<()> {
    store.set_area_active(area_id, true)
}

/// Add a sub-area to an area's ordered list.
///
/// # Errors
///
/// Returns [`Error::AreaNotFound`] if the area is absent and
/// [`Error::DuplicateName`] on a case-insensitive name collision within
/// the area.
pub fn add_sub_area(store: &Store, area_id: i64, name: &str) -> Result<SubArea> {
    require_area(store, area_id)?;
    store.insert_sub_area(area_id, name)
}

/// Rename one of an area's sub-areas, keeping its position.
///
/// # Errors
///
/// Returns [`Error::SubAreaNotFound`] if the sub-area is not part of this
/// area and [`Error::DuplicateName`] on a collision.
pub fn rename_sub_area(store: &Store, area_id: i64, sub_area_id: i64, name: &str) -> Result<()> {
    require_membership(store, area_id, sub_area_id)?;
    store.update_sub_area_name(sub_area_id, name)
}

/// Remove one of an area's sub-areas.
///
/// # Errors
///
/// Returns [`Error::SubAreaNotFound`] if the sub-area is not part of this
/// area.
pub fn remove_sub_area(store: &Store, area_id: i64, sub_area_id: i64) -> Result<()> {
    require_membership(store, area_id, sub_area_id)?;
    store.delete_sub_area(sub_area_id)
}

/// List claims as seen by a viewer. Clients only ever see their own
/// claims; staff may narrow to a specific client with `client_id`.
///
/// # Errors
///
/// Returns [`Error::Store`] on query failure.
pub fn list_claims_for(
    store: &Store,
    viewer: &User,
    client_id: Option<i64>,
    status: Option<Status>,
) -> Result<Vec<Claim>> {
    let created_by = match viewer.role {
        Role::Client => Some(viewer.id),
        Role::Admin | Role::Employee => client_id,
    };
    store.list_claims(&ClaimFilter { created_by, status })
}

fn require_area(store: &Store, area_id: i64) -> Result<Area> {
    store
        .get_area(area_id)?
        .ok_or(Error::AreaNotFound { area_id })
}

fn require_membership(store: &Store, area_id: i64, sub_area_id: i64) -> Result<()> {
    let area = require_area(store, area_id)?;
    if !area.sub_areas.iter().any(|sub| sub.id == sub_area_id) {
        return Err(Error::SubAreaNotFound { sub_area_id });
    }
    Ok(())
}
