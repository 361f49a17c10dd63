//! Entity reads and writes: users, areas (with embedded sub-areas),
//! projects, claims, and client feedback messages.
//!
//! This module is SQL only. Business rules (transition validation, area
//! guards, feedback gating) live in the engine, feedback, and directory
//! modules; everything here maps rows to the typed records in [`crate::model`].

use rusqlite::{OptionalExtension, params, types::Type};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::model::area::{Area, SubArea};
use crate::model::claim::{Attachment, Claim, Priority, Severity, Status};
use crate::model::feedback::{FeedbackKind, FeedbackMessage};
use crate::model::project::Project;
use crate::model::user::{Role, User};

use super::{Store, map_unique_violation, now_us};

/// Fields for a new user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub area_id: Option<i64>,
    pub company_name: Option<String>,
}

/// Sparse update for a user row. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub area_id: Option<Option<i64>>,
    pub company_name: Option<Option<String>>,
}

/// Sparse update for an area row.
#[derive(Debug, Clone, Default)]
pub struct AreaChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Sparse update for a project row.
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub project_type: Option<String>,
    pub client_id: Option<i64>,
}

/// Fields for a new claim row. Status and priority take their intake
/// defaults (`intake`, `medium`).
#[derive(Debug, Clone)]
pub struct NewClaim {
    pub project_id: i64,
    pub claim_type: String,
    pub severity: Option<Severity>,
    pub description: String,
    pub sub_area: Option<String>,
    pub attachment: Option<Attachment>,
    pub created_by: i64,
}

/// Staged claim snapshot update, produced by the lifecycle engine or the
/// feedback workflow. `None` fields are left untouched; the double-`Option`
/// fields distinguish "untouched" from "set to NULL".
#[derive(Debug, Clone, Default)]
pub struct ClaimUpdates {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub area_id: Option<Option<i64>>,
    pub sub_area: Option<Option<String>>,
    pub resolution_description: Option<String>,
    pub resolved_at_us: Option<i64>,
    pub client_rating: Option<i64>,
    pub client_feedback: Option<String>,
}

impl ClaimUpdates {
    /// Whether no field is staged.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.area_id.is_none()
            && self.sub_area.is_none()
            && self.resolution_description.is_none()
            && self.resolved_at_us.is_none()
            && self.client_rating.is_none()
            && self.client_feedback.is_none()
    }
}

/// Filter for claim listings.
#[derive(Debug, Clone, Default)]
pub struct ClaimFilter {
    /// Restrict to claims created by this client.
    pub created_by: Option<i64>,
    pub status: Option<Status>,
}

fn as_params(args: &[Box<dyn rusqlite::ToSql>]) -> Vec<&dyn rusqlite::ToSql> {
    args.iter().map(AsRef::as_ref).collect()
}

fn parse_col<T>(idx: usize, value: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let role: String = row.get(3)?;
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        full_name: row.get(2)?,
        role: parse_col(3, &role)?,
        area_id: row.get(4)?,
        company_name: row.get(5)?,
        is_active: row.get(6)?,
        created_at_us: row.get(7)?,
        updated_at_us: row.get(8)?,
    })
}

const USER_COLS: &str =
    "id, email, full_name, role, area_id, company_name, is_active, created_at_us, updated_at_us";

fn claim_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Claim> {
    let priority: String = row.get(3)?;
    let severity: Option<String> = row.get(4)?;
    let status: String = row.get(6)?;
    let attachment_path: Option<String> = row.get(12)?;
    let attachment_name: Option<String> = row.get(13)?;

    let severity = match severity {
        Some(s) => Some(parse_col(4, &s)?),
        None => None,
    };
    let attachment = match (attachment_path, attachment_name) {
        (Some(path), Some(name)) => Some(Attachment { path, name }),
        _ => None,
    };

    Ok(Claim {
        id: row.get(0)?,
        project_id: row.get(1)?,
        claim_type: row.get(2)?,
        priority: parse_col(3, &priority)?,
        severity,
        description: row.get(5)?,
        status: parse_col(6, &status)?,
        area_id: row.get(7)?,
        sub_area: row.get(8)?,
        resolution_description: row.get(9)?,
        client_rating: row.get(10)?,
        client_feedback: row.get(11)?,
        attachment,
        created_by: row.get(14)?,
        created_at_us: row.get(15)?,
        updated_at_us: row.get(16)?,
        resolved_at_us: row.get(17)?,
    })
}

const CLAIM_COLS: &str = "id, project_id, claim_type, priority, severity, description, status, \
     area_id, sub_area, resolution_description, client_rating, client_feedback, \
     attachment_path, attachment_name, created_by, created_at_us, updated_at_us, resolved_at_us";

fn feedback_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FeedbackMessage> {
    let kind: String = row.get(5)?;
    Ok(FeedbackMessage {
        id: row.get(0)?,
        claim_id: row.get(1)?,
        client_id: row.get(2)?,
        message: row.get(3)?,
        rating: row.get(4)?,
        kind: parse_col(5, &kind)?,
        created_at_us: row.get(6)?,
    })
}

const FEEDBACK_COLS: &str = "id, claim_id, client_id, message, rating, kind, created_at_us";

impl Store {
    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    /// Insert a new user. Emails are stored lowercased and trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] when the email is already taken.
    pub fn create_user(&self, new: &NewUser) -> Result<User> {
        let email = new.email.trim().to_lowercase();
        let now = now_us();
        self.conn()
            .execute(
                "INSERT INTO users (email, full_name, role, area_id, company_name, created_at_us, updated_at_us)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                params![
                    email,
                    new.full_name,
                    new.role.as_str(),
                    new.area_id,
                    new.company_name,
                    now,
                ],
            )
            .map_err(|e| map_unique_violation(e, &email))?;
        let id = self.conn().last_insert_rowid();
        self.require_user(id)
    }

    /// Fetch a user by id.
    ///
    /// # Errors
    ///
    /// Returns a store error if the query fails.
    pub fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        let user = self
            .conn()
            .query_row(
                &format!("SELECT {USER_COLS} FROM users WHERE id = ?1"),
                params![user_id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Fetch a user by email (stored lowercased).
    ///
    /// # Errors
    ///
    /// Returns a store error if the query fails.
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = self
            .conn()
            .query_row(
                &format!("SELECT {USER_COLS} FROM users WHERE email = ?1"),
                params![email.trim().to_lowercase()],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// List users ordered by email, optionally filtered by role and
    /// restricted to active accounts.
    ///
    /// # Errors
    ///
    /// Returns a store error if the query fails.
    pub fn list_users(&self, role: Option<Role>, active_only: bool) -> Result<Vec<User>> {
        let mut sql = format!("SELECT {USER_COLS} FROM users WHERE 1 = 1");
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        if let Some(role) = role {
            sql.push_str(" AND role = ?");
            args.push(Box::new(role.as_str()));
        }
        if active_only {
            sql.push_str(" AND is_active = 1");
        }
        sql.push_str(" ORDER BY email ASC");

        let mut stmt = self.conn().prepare(&sql)?;
        let users = stmt
            .query_map(rusqlite::params_from_iter(as_params(&args)), user_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    /// Apply a sparse update to a user row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserNotFound`] if the user does not exist and
    /// [`Error::DuplicateName`] on an email collision.
    pub fn update_user(&self, user_id: i64, changes: &UserChanges) -> Result<User> {
        let mut sets: Vec<&str> = Vec::new();
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        let email = changes.email.as_ref().map(|e| e.trim().to_lowercase());

        if let Some(email) = &email {
            sets.push("email = ?");
            args.push(Box::new(email.clone()));
        }
        if let Some(full_name) = &changes.full_name {
            sets.push("full_name = ?");
            args.push(Box::new(full_name.clone()));
        }
        if let Some(area_id) = changes.area_id {
            sets.push("area_id = ?");
            args.push(Box::new(area_id));
        }
        if let Some(company_name) = &changes.company_name {
            sets.push("company_name = ?");
            args.push(Box::new(company_name.clone()));
        }

        if !sets.is_empty() {
            sets.push("updated_at_us = ?");
            args.push(Box::new(now_us()));
            let sql = format!("UPDATE users SET {} WHERE id = ?", sets.join(", "));
            args.push(Box::new(user_id));
            self.conn()
                .execute(&sql, rusqlite::params_from_iter(as_params(&args)))
                .map_err(|e| map_unique_violation(e, email.as_deref().unwrap_or_default()))?;
        }
        self.require_user(user_id)
    }

    /// Flip a user's active flag (soft delete / reinstate).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserNotFound`] if the user does not exist.
    pub fn set_user_active(&self, user_id: i64, active: bool) -> Result<()> {
        let changed = self.conn().execute(
            "UPDATE users SET is_active = ?1, updated_at_us = ?2 WHERE id = ?3",
            params![active, now_us(), user_id],
        )?;
        if changed == 0 {
            return Err(Error::UserNotFound { user_id });
        }
        Ok(())
    }

    /// Number of active employees attached to an area.
    ///
    /// # Errors
    ///
    /// Returns a store error if the query fails.
    pub fn count_active_employees(&self, area_id: i64) -> Result<i64> {
        let count = self.conn().query_row(
            "SELECT COUNT(*) FROM users
             WHERE role = 'employee' AND area_id = ?1 AND is_active = 1",
            params![area_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn require_user(&self, user_id: i64) -> Result<User> {
        self.get_user(user_id)?
            .ok_or(Error::UserNotFound { user_id })
    }

    // -----------------------------------------------------------------------
    // Areas
    // -----------------------------------------------------------------------

    /// Insert a new area.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] when the name is already taken.
    pub fn create_area(&self, name: &str, description: &str) -> Result<Area> {
        let name = name.trim();
        let now = now_us();
        self.conn()
            .execute(
                "INSERT INTO areas (name, description, created_at_us, updated_at_us)
                 VALUES (?1, ?2, ?3, ?3)",
                params![name, description.trim(), now],
            )
            .map_err(|e| map_unique_violation(e, name))?;
        self.require_area(self.conn().last_insert_rowid())
    }

    /// Fetch an area by id, including its ordered sub-area list.
    ///
    /// # Errors
    ///
    /// Returns a store error if the query fails.
    pub fn get_area(&self, area_id: i64) -> Result<Option<Area>> {
        let header = self
            .conn()
            .query_row(
                "SELECT id, name, description, is_active, created_at_us, updated_at_us
                 FROM areas WHERE id = ?1",
                params![area_id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, bool>(3)?,
                        row.get::<_, i64>(4)?,
                        row.get::<_, i64>(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, name, description, is_active, created_at_us, updated_at_us)) = header else {
            return Ok(None);
        };

        Ok(Some(Area {
            id,
            name,
            description,
            sub_areas: self.sub_areas_of(id)?,
            is_active,
            created_at_us,
            updated_at_us,
        }))
    }

    /// List areas ordered by name.
    ///
    /// # Errors
    ///
    /// Returns a store error if the query fails.
    pub fn list_areas(&self, active_only: bool) -> Result<Vec<Area>> {
        let sql = if active_only {
            "SELECT id FROM areas WHERE is_active = 1 ORDER BY name ASC"
        } else {
            "SELECT id FROM areas ORDER BY name ASC"
        };
        let mut stmt = self.conn().prepare(sql)?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut areas = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(area) = self.get_area(id)? {
                areas.push(area);
            }
        }
        Ok(areas)
    }

    /// Apply a sparse update to an area row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AreaNotFound`] if the area does not exist and
    /// [`Error::DuplicateName`] on a name collision.
    pub fn update_area(&self, area_id: i64, changes: &AreaChanges) -> Result<Area> {
        let mut sets: Vec<&str> = Vec::new();
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        let name = changes.name.as_ref().map(|n| n.trim().to_string());

        if let Some(name) = &name {
            sets.push("name = ?");
            args.push(Box::new(name.clone()));
        }
        if let Some(description) = &changes.description {
            sets.push("description = ?");
            args.push(Box::new(description.trim().to_string()));
        }

        if !sets.is_empty() {
            sets.push("updated_at_us = ?");
            args.push(Box::new(now_us()));
            let sql = format!("UPDATE areas SET {} WHERE id = ?", sets.join(", "));
            args.push(Box::new(area_id));
            self.conn()
                .execute(&sql, rusqlite::params_from_iter(as_params(&args)))
                .map_err(|e| map_unique_violation(e, name.as_deref().unwrap_or_default()))?;
        }
        self.require_area(area_id)
    }

    /// Flip an area's active flag. The employee guard lives in the directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AreaNotFound`] if the area does not exist.
    pub fn set_area_active(&self, area_id: i64, active: bool) -> Result<()> {
        let changed = self.conn().execute(
            "UPDATE areas SET is_active = ?1, updated_at_us = ?2 WHERE id = ?3",
            params![active, now_us(), area_id],
        )?;
        if changed == 0 {
            return Err(Error::AreaNotFound { area_id });
        }
        Ok(())
    }

    fn require_area(&self, area_id: i64) -> Result<Area> {
        self.get_area(area_id)?
            .ok_or(Error::AreaNotFound { area_id })
    }

    fn sub_areas_of(&self, area_id: i64) -> Result<Vec<SubArea>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, name FROM area_sub_areas WHERE area_id = ?1 ORDER BY position ASC",
        )?;
        let subs = stmt
            .query_map(params![area_id], |row| {
                Ok(SubArea {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(subs)
    }

    /// Append a sub-area at the end of an area's list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] when the name collides
    /// (case-insensitively) within the area.
    pub fn insert_sub_area(&self, area_id: i64, name: &str) -> Result<SubArea> {
        let name = name.trim();
        let next_position: i64 = self.conn().query_row(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM area_sub_areas WHERE area_id = ?1",
            params![area_id],
            |row| row.get(0),
        )?;
        self.conn()
            .execute(
                "INSERT INTO area_sub_areas (area_id, name, position) VALUES (?1, ?2, ?3)",
                params![area_id, name, next_position],
            )
            .map_err(|e| map_unique_violation(e, name))?;
        Ok(SubArea {
            id: self.conn().last_insert_rowid(),
            name: name.to_string(),
        })
    }

    /// Rename a sub-area in place, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SubAreaNotFound`] if the row is missing and
    /// [`Error::DuplicateName`] on a case-insensitive collision.
    pub fn update_sub_area_name(&self, sub_area_id: i64, name: &str) -> Result<()> {
        let name = name.trim();
        let changed = self
            .conn()
            .execute(
                "UPDATE area_sub_areas SET name = ?1 WHERE id = ?2",
                params![name, sub_area_id],
            )
            .map_err(|e| map_unique_violation(e, name))?;
        if changed == 0 {
            return Err(Error::SubAreaNotFound { sub_area_id });
        }
        Ok(())
    }

    /// Remove a sub-area row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SubAreaNotFound`] if the row is missing.
    pub fn delete_sub_area(&self, sub_area_id: i64) -> Result<()> {
        let changed = self.conn().execute(
            "DELETE FROM area_sub_areas WHERE id = ?1",
            params![sub_area_id],
        )?;
        if changed == 0 {
            return Err(Error::SubAreaNotFound { sub_area_id });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    /// Insert a new project.
    ///
    /// # Errors
    ///
    /// Returns a store error if the insert fails.
    pub fn create_project(&self, name: &str, project_type: &str, client_id: i64) -> Result<Project> {
        let now = now_us();
        self.conn().execute(
            "INSERT INTO projects (name, project_type, client_id, created_at_us, updated_at_us)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![name.trim(), project_type.trim(), client_id, now],
        )?;
        self.require_project(self.conn().last_insert_rowid())
    }

    /// Fetch a project by id.
    ///
    /// # Errors
    ///
    /// Returns a store error if the query fails.
    pub fn get_project(&self, project_id: i64) -> Result<Option<Project>> {
        let project = self
            .conn()
            .query_row(
                "SELECT id, name, project_type, client_id, is_active, created_at_us, updated_at_us
                 FROM projects WHERE id = ?1",
                params![project_id],
                project_from_row,
            )
            .optional()?;
        Ok(project)
    }

    /// List projects newest-first, optionally restricted to one client.
    ///
    /// # Errors
    ///
    /// Returns a store error if the query fails.
    pub fn list_projects(&self, client_id: Option<i64>, active_only: bool) -> Result<Vec<Project>> {
        let mut sql = String::from(
            "SELECT id, name, project_type, client_id, is_active, created_at_us, updated_at_us
             FROM projects WHERE 1 = 1",
        );
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        if let Some(client_id) = client_id {
            sql.push_str(" AND client_id = ?");
            args.push(Box::new(client_id));
        }
        if active_only {
            sql.push_str(" AND is_active = 1");
        }
        sql.push_str(" ORDER BY created_at_us DESC");

        let mut stmt = self.conn().prepare(&sql)?;
        let projects = stmt
            .query_map(rusqlite::params_from_iter(as_params(&args)), project_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(projects)
    }

    /// Apply a sparse update to a project row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProjectNotFound`] if the project does not exist.
    pub fn update_project(&self, project_id: i64, changes: &ProjectChanges) -> Result<Project> {
        let mut sets: Vec<&str> = Vec::new();
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(name) = &changes.name {
            sets.push("name = ?");
            args.push(Box::new(name.trim().to_string()));
        }
        if let Some(project_type) = &changes.project_type {
            sets.push("project_type = ?");
            args.push(Box::new(project_type.trim().to_string()));
        }
        if let Some(client_id) = changes.client_id {
            sets.push("client_id = ?");
            args.push(Box::new(client_id));
        }

        if !sets.is_empty() {
            sets.push("updated_at_us = ?");
            args.push(Box::new(now_us()));
            let sql = format!("UPDATE projects SET {} WHERE id = ?", sets.join(", "));
            args.push(Box::new(project_id));
            self.conn()
                .execute(&sql, rusqlite::params_from_iter(as_params(&args)))?;
        }
        self.require_project(project_id)
    }

    /// Flip a project's active flag (soft delete / reinstate).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProjectNotFound`] if the project does not exist.
    pub fn set_project_active(&self, project_id: i64, active: bool) -> Result<()> {
        let changed = self.conn().execute(
            "UPDATE projects SET is_active = ?1, updated_at_us = ?2 WHERE id = ?3",
            params![active, now_us(), project_id],
        )?;
        if changed == 0 {
            return Err(Error::ProjectNotFound { project_id });
        }
        Ok(())
    }

    fn require_project(&self, project_id: i64) -> Result<Project> {
        self.get_project(project_id)?
            .ok_or(Error::ProjectNotFound { project_id })
    }

    // -----------------------------------------------------------------------
    // Claims
    // -----------------------------------------------------------------------

    /// Insert a new claim row with intake defaults. The mandatory `created`
    /// audit event is appended by the engine, not here.
    ///
    /// # Errors
    ///
    /// Returns a store error if the insert fails.
    pub fn insert_claim(&self, new: &NewClaim) -> Result<Claim> {
        let now = now_us();
        self.conn().execute(
            "INSERT INTO claims (
                project_id, claim_type, severity, description, sub_area,
                attachment_path, attachment_name, created_by, created_at_us, updated_at_us
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
            params![
                new.project_id,
                new.claim_type.trim(),
                new.severity.map(Severity::as_str),
                new.description.trim(),
                new.sub_area.as_deref().map(str::trim),
                new.attachment.as_ref().map(|a| a.path.as_str()),
                new.attachment.as_ref().map(|a| a.name.as_str()),
                new.created_by,
                now,
            ],
        )?;
        let id = self.conn().last_insert_rowid();
        self.get_claim(id)?.ok_or(Error::ClaimNotFound { claim_id: id })
    }

    /// Fetch a claim snapshot by id.
    ///
    /// # Errors
    ///
    /// Returns a store error if the query fails.
    pub fn get_claim(&self, claim_id: i64) -> Result<Option<Claim>> {
        let claim = self
            .conn()
            .query_row(
                &format!("SELECT {CLAIM_COLS} FROM claims WHERE id = ?1"),
                params![claim_id],
                claim_from_row,
            )
            .optional()?;
        Ok(claim)
    }

    /// List claim snapshots newest-first.
    ///
    /// # Errors
    ///
    /// Returns a store error if the query fails.
    pub fn list_claims(&self, filter: &ClaimFilter) -> Result<Vec<Claim>> {
        let mut sql = format!("SELECT {CLAIM_COLS} FROM claims WHERE 1 = 1");
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        if let Some(created_by) = filter.created_by {
            sql.push_str(" AND created_by = ?");
            args.push(Box::new(created_by));
        }
        if let Some(status) = filter.status {
            sql.push_str(" AND status = ?");
            args.push(Box::new(status.as_str()));
        }
        sql.push_str(" ORDER BY created_at_us DESC");

        let mut stmt = self.conn().prepare(&sql)?;
        let claims = stmt
            .query_map(rusqlite::params_from_iter(as_params(&args)), claim_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(claims)
    }

    /// Write a staged snapshot update. Always bumps `updated_at_us`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClaimNotFound`] if the claim does not exist.
    pub fn persist_claim(&self, claim_id: i64, updates: &ClaimUpdates) -> Result<()> {
        if updates.is_empty() {
            return Ok(());
        }

        let mut sets: Vec<&str> = Vec::new();
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(status) = updates.status {
            sets.push("status = ?");
            args.push(Box::new(status.as_str()));
        }
        if let Some(priority) = updates.priority {
            sets.push("priority = ?");
            args.push(Box::new(priority.as_str()));
        }
        if let Some(area_id) = updates.area_id {
            sets.push("area_id = ?");
            args.push(Box::new(area_id));
        }
        if let Some(sub_area) = &updates.sub_area {
            sets.push("sub_area = ?");
            args.push(Box::new(sub_area.clone()));
        }
        if let Some(resolution) = &updates.resolution_description {
            sets.push("resolution_description = ?");
            args.push(Box::new(resolution.clone()));
        }
        if let Some(resolved_at_us) = updates.resolved_at_us {
            sets.push("resolved_at_us = ?");
            args.push(Box::new(resolved_at_us));
        }
        if let Some(rating) = updates.client_rating {
            sets.push("client_rating = ?");
            args.push(Box::new(rating));
        }
        if let Some(feedback) = &updates.client_feedback {
            sets.push("client_feedback = ?");
            args.push(Box::new(feedback.clone()));
        }

        sets.push("updated_at_us = ?");
        args.push(Box::new(now_us()));
        let sql = format!("UPDATE claims SET {} WHERE id = ?", sets.join(", "));
        args.push(Box::new(claim_id));

        let changed = self
            .conn()
            .execute(&sql, rusqlite::params_from_iter(as_params(&args)))?;
        if changed == 0 {
            return Err(Error::ClaimNotFound { claim_id });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Feedback messages
    // -----------------------------------------------------------------------

    /// Insert a feedback message row. Gating lives in the feedback workflow.
    ///
    /// # Errors
    ///
    /// Returns a store error if the insert fails.
    pub fn insert_feedback_message(
        &self,
        claim_id: i64,
        client_id: i64,
        message: Option<&str>,
        rating: Option<i64>,
        kind: FeedbackKind,
    ) -> Result<FeedbackMessage> {
        self.conn().execute(
            "INSERT INTO feedback_messages (claim_id, client_id, message, rating, kind, created_at_us)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![claim_id, client_id, message, rating, kind.as_str(), now_us()],
        )?;
        let id = self.conn().last_insert_rowid();
        let message = self.conn().query_row(
            &format!("SELECT {FEEDBACK_COLS} FROM feedback_messages WHERE id = ?1"),
            params![id],
            feedback_from_row,
        )?;
        Ok(message)
    }

    /// The final-type message for a claim, if any. At most one exists.
    ///
    /// # Errors
    ///
    /// Returns a store error if the query fails.
    pub fn find_final_feedback(&self, claim_id: i64) -> Result<Option<FeedbackMessage>> {
        let message = self
            .conn()
            .query_row(
                &format!(
                    "SELECT {FEEDBACK_COLS} FROM feedback_messages
                     WHERE claim_id = ?1 AND kind = 'final'
                     ORDER BY created_at_us ASC LIMIT 1"
                ),
                params![claim_id],
                feedback_from_row,
            )
            .optional()?;
        Ok(message)
    }

    /// All feedback messages for a claim, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a store error if the query fails.
    pub fn list_feedback_messages(&self, claim_id: i64) -> Result<Vec<FeedbackMessage>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {FEEDBACK_COLS} FROM feedback_messages
             WHERE claim_id = ?1 ORDER BY created_at_us ASC, id ASC"
        ))?;
        let messages = stmt
            .query_map(params![claim_id], feedback_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(messages)
    }
}

fn project_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        project_type: row.get(2)?,
        client_id: row.get(3)?,
        is_active: row.get(4)?,
        created_at_us: row.get(5)?,
        updated_at_us: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn store() -> Store {
        Store::open_in_memory().expect("open in-memory store")
    }

    fn client(store: &Store) -> User {
        store
            .create_user(&NewUser {
                email: "client@example.com".into(),
                full_name: "Client One".into(),
                role: Role::Client,
                area_id: None,
                company_name: Some("ACME".into()),
            })
            .expect("create client")
    }

    fn claim_for(store: &Store, created_by: i64) -> Claim {
        let project = store
            .create_project("Portal", "web", created_by)
            .expect("create project");
        store
            .insert_claim(&NewClaim {
                project_id: project.id,
                claim_type: "outage".into(),
                severity: Some(Severity::S2High),
                description: "Login broken".into(),
                sub_area: None,
                attachment: None,
                created_by,
            })
            .expect("insert claim")
    }

    #[test]
    fn create_user_lowercases_email_and_rejects_duplicates() {
        let store = store();
        let user = store
            .create_user(&NewUser {
                email: "  Ana@Example.COM ".into(),
                full_name: "Ana".into(),
                role: Role::Employee,
                area_id: None,
                company_name: None,
            })
            .expect("create user");
        assert_eq!(user.email, "ana@example.com");

        let err = store
            .create_user(&NewUser {
                email: "ana@example.com".into(),
                full_name: "Other".into(),
                role: Role::Client,
                area_id: None,
                company_name: None,
            })
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateName { .. }));
    }

    #[test]
    fn blank_area_name_is_not_reported_as_duplicate() {
        let store = store();
        // Trips the CHECK constraint, not the UNIQUE one.
        let err = store.create_area("   ", "").unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }

    #[test]
    fn dangling_area_reference_is_not_reported_as_duplicate() {
        let store = store();
        let err = store
            .create_user(&NewUser {
                email: "lost@example.com".into(),
                full_name: String::new(),
                role: Role::Client,
                area_id: Some(999),
                company_name: None,
            })
            .unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }

    #[test]
    fn claim_insert_applies_intake_defaults() {
        let store = store();
        let owner = client(&store);
        let claim = claim_for(&store, owner.id);

        assert_eq!(claim.status, Status::Intake);
        assert_eq!(claim.priority, Priority::Medium);
        assert!(claim.area_id.is_none());
        assert!(claim.resolved_at_us.is_none());
        assert_eq!(claim.severity, Some(Severity::S2High));
    }

    #[test]
    fn persist_claim_distinguishes_clear_from_untouched() {
        let store = store();
        let owner = client(&store);
        let claim = claim_for(&store, owner.id);
        let area = store.create_area("IT", "").expect("create area");

        store
            .persist_claim(
                claim.id,
                &ClaimUpdates {
                    area_id: Some(Some(area.id)),
                    ..ClaimUpdates::default()
                },
            )
            .expect("assign area");
        let assigned = store.get_claim(claim.id).expect("get").expect("exists");
        assert_eq!(assigned.area_id, Some(area.id));

        // Untouched: area survives a priority-only update.
        store
            .persist_claim(
                claim.id,
                &ClaimUpdates {
                    priority: Some(Priority::High),
                    ..ClaimUpdates::default()
                },
            )
            .expect("bump priority");
        let bumped = store.get_claim(claim.id).expect("get").expect("exists");
        assert_eq!(bumped.area_id, Some(area.id));
        assert_eq!(bumped.priority, Priority::High);

        // Explicit clear.
        store
            .persist_claim(
                claim.id,
                &ClaimUpdates {
                    area_id: Some(None),
                    ..ClaimUpdates::default()
                },
            )
            .expect("clear area");
        let cleared = store.get_claim(claim.id).expect("get").expect("exists");
        assert_eq!(cleared.area_id, None);
    }

    #[test]
    fn sub_area_names_unique_ignoring_case() {
        let store = store();
        let area = store.create_area("IT", "").expect("create area");
        store
            .insert_sub_area(area.id, "Backend")
            .expect("insert sub-area");
        let err = store.insert_sub_area(area.id, "backend").unwrap_err();
        assert!(matches!(err, Error::DuplicateName { .. }));

        // The same name is fine in a different area.
        let other = store.create_area("Ops", "").expect("create area");
        store
            .insert_sub_area(other.id, "Backend")
            .expect("insert in other area");
    }

    #[test]
    fn sub_areas_keep_insertion_order() {
        let store = store();
        let area = store.create_area("IT", "").expect("create area");
        for name in ["Backend", "Frontend", "Networks"] {
            store.insert_sub_area(area.id, name).expect("insert");
        }
        let area = store.get_area(area.id).expect("get").expect("exists");
        let names: Vec<&str> = area.sub_areas.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Backend", "Frontend", "Networks"]);
    }

    #[test]
    fn list_claims_filters_by_owner_and_status() {
        let store = store();
        let owner = client(&store);
        let other = store
            .create_user(&NewUser {
                email: "other@example.com".into(),
                full_name: String::new(),
                role: Role::Client,
                area_id: None,
                company_name: None,
            })
            .expect("create other client");

        let mine = claim_for(&store, owner.id);
        let _theirs = claim_for(&store, other.id);

        let listed = store
            .list_claims(&ClaimFilter {
                created_by: Some(owner.id),
                status: None,
            })
            .expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, mine.id);

        let resolved = store
            .list_claims(&ClaimFilter {
                created_by: None,
                status: Some(Status::Resolved),
            })
            .expect("list");
        assert!(resolved.is_empty());
    }

    #[test]
    fn final_feedback_lookup() {
        let store = store();
        let owner = client(&store);
        let claim = claim_for(&store, owner.id);

        assert!(
            store
                .find_final_feedback(claim.id)
                .expect("lookup")
                .is_none()
        );

        store
            .insert_feedback_message(claim.id, owner.id, Some("ok"), None, FeedbackKind::Progress)
            .expect("progress message");
        assert!(
            store
                .find_final_feedback(claim.id)
                .expect("lookup")
                .is_none()
        );

        store
            .insert_feedback_message(claim.id, owner.id, Some("great"), Some(5), FeedbackKind::Final)
            .expect("final message");
        let found = store
            .find_final_feedback(claim.id)
            .expect("lookup")
            .expect("exists");
        assert_eq!(found.rating, Some(5));
        assert_eq!(found.kind, FeedbackKind::Final);
    }

    #[test]
    fn deactivated_employee_stops_counting() {
        let store = store();
        let area = store.create_area("IT", "").expect("create area");
        let employee = store
            .create_user(&NewUser {
                email: "emp@example.com".into(),
                full_name: "Emp".into(),
                role: Role::Employee,
                area_id: Some(area.id),
                company_name: None,
            })
            .expect("create employee");

        assert_eq!(
            store.count_active_employees(area.id).expect("count"),
            1
        );
        store
            .set_user_active(employee.id, false)
            .expect("deactivate");
        assert_eq!(
            store.count_active_employees(area.id).expect("count"),
            0
        );
    }
}
