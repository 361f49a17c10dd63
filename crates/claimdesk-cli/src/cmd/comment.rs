//! `claimdesk comment` and `claimdesk action` — internal annotations on a
//! claim's audit log.

use anyhow::Result;
use clap::Args;
use std::path::Path;

use claimdesk_core::engine;

use crate::actor::resolve_actor;
use crate::cmd::open_store;
use crate::output::{OutputMode, render_success};

#[derive(Args, Debug)]
pub struct CommentArgs {
    /// Claim id.
    pub id: i64,

    /// Comment body.
    pub body: String,
}

#[derive(Args, Debug)]
pub struct ActionArgs {
    /// Claim id.
    pub id: i64,

    /// What was done (must be non-blank).
    pub description: String,
}

pub fn run_comment(
    args: &CommentArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> Result<()> {
    let store = open_store(project_root)?;
    let actor = resolve_actor(&store, actor_flag)?;
    engine::add_claim_comment(&store, &actor, args.id, &args.body)?;
    render_success(output, &format!("comment added to claim #{}", args.id))
}

pub fn run_action(
    args: &ActionArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> Result<()> {
    let store = open_store(project_root)?;
    let actor = resolve_actor(&store, actor_flag)?;
    engine::add_claim_action(&store, &actor, args.id, &args.description)?;
    render_success(output, &format!("action logged on claim #{}", args.id))
}
