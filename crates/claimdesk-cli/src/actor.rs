//! Actor identity resolution.
//!
//! Every mutating command runs as a registered user. The identity comes
//! from the `--actor` flag, falling back to the `CLAIMDESK_ACTOR`
//! environment variable, and is resolved against the user directory.

use anyhow::{Context, Result, bail};
use claimdesk_core::{Store, User};
use std::env;

pub const ACTOR_ENV: &str = "CLAIMDESK_ACTOR";

/// Resolve the acting user from the `--actor` flag or the environment.
pub fn resolve_actor(store: &Store, actor_flag: Option<&str>) -> Result<User> {
    let email = match actor_flag {
        Some(email) => email.to_string(),
        None => env::var(ACTOR_ENV)
            .with_context(|| format!("no actor: pass --actor <email> or set {ACTOR_ENV}"))?,
    };

    let user = store
        .get_user_by_email(&email)?
        .with_context(|| format!("no user registered with email '{email}'"))?;
    if !user.is_active {
        bail!("user '{email}' is deactivated");
    }
    Ok(user)
}
