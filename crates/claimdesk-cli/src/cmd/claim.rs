//! `claimdesk create`, `show`, `list`, and `update` — the claim lifecycle
//! commands.

use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::Path;

use claimdesk_core::engine::{self, ChangeSet, ClaimDraft};
use claimdesk_core::{Attachment, Claim, Priority, Severity, Status, directory};

use crate::actor::resolve_actor;
use crate::cmd::{open_store, open_workspace};
use crate::output::{OutputMode, dash, fmt_us, kv, render};

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Project the claim belongs to.
    #[arg(long)]
    pub project: i64,

    /// Claim type label (defaults to the workspace config value).
    #[arg(long = "type")]
    pub claim_type: Option<String>,

    /// Severity: s1_critical, s2_high, s3_medium, or s4_low.
    #[arg(long)]
    pub severity: Option<String>,

    /// What went wrong.
    pub description: String,

    /// Suggested sub-area within the eventual owning area.
    #[arg(long)]
    pub sub_area: Option<String>,

    /// Path of a supporting file already uploaded elsewhere.
    #[arg(long)]
    pub attachment: Option<String>,

    /// Display name for the attachment (defaults to the path).
    #[arg(long, requires = "attachment")]
    pub attachment_name: Option<String>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Claim id.
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only claims opened by this client (staff only; ignored for clients,
    /// who always see just their own).
    #[arg(long)]
    pub client: Option<i64>,

    /// Only claims in this status: intake, in_progress, or resolved.
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Claim id.
    pub id: i64,

    /// Target status: intake, in_progress, or resolved.
    #[arg(long)]
    pub status: Option<String>,

    /// New priority: low, medium, or high.
    #[arg(long)]
    pub priority: Option<String>,

    /// Route the claim to this area.
    #[arg(long, conflicts_with = "clear_area")]
    pub area: Option<i64>,

    /// Clear the area assignment.
    #[arg(long)]
    pub clear_area: bool,

    /// Set the sub-area label.
    #[arg(long, conflicts_with = "clear_sub_area")]
    pub sub_area: Option<String>,

    /// Clear the sub-area label.
    #[arg(long)]
    pub clear_sub_area: bool,

    /// Why the claim is being re-routed (required when moving between areas).
    #[arg(long)]
    pub reason: Option<String>,

    /// How the claim was fixed (required when resolving).
    #[arg(long)]
    pub resolution: Option<String>,
}

pub fn run_create(
    args: &CreateArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> Result<()> {
    let (store, cfg) = open_workspace(project_root)?;
    let actor = resolve_actor(&store, actor_flag)?;

    let severity = args
        .severity
        .as_deref()
        .map(str::parse::<Severity>)
        .transpose()?;
    let attachment = args.attachment.as_ref().map(|path| Attachment {
        path: path.clone(),
        name: args
            .attachment_name
            .clone()
            .unwrap_or_else(|| path.clone()),
    });

    let claim = engine::create_claim(
        &store,
        &actor,
        ClaimDraft {
            project_id: args.project,
            claim_type: args
                .claim_type
                .clone()
                .unwrap_or(cfg.intake.default_claim_type),
            severity,
            description: args.description.clone(),
            sub_area: args.sub_area.clone(),
            attachment,
        },
    )?;
    render(output, &claim, print_claim)
}

pub fn run_show(args: &ShowArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let store = open_store(project_root)?;
    let claim = store
        .get_claim(args.id)?
        .with_context(|| format!("no claim with id {}", args.id))?;
    render(output, &claim, print_claim)
}

pub fn run_list(
    args: &ListArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> Result<()> {
    let store = open_store(project_root)?;
    let actor = resolve_actor(&store, actor_flag)?;
    let status = args.status.as_deref().map(str::parse::<Status>).transpose()?;
    let claims = directory::list_claims_for(&store, &actor, args.client, status)?;
    render(output, &claims, |claims, w| {
        for claim in claims {
            writeln!(
                w,
                "#{:<5} {:<12} {:<8} {}",
                claim.id,
                claim.status.as_str(),
                claim.priority.as_str(),
                claim.description
            )?;
        }
        Ok(())
    })
}

pub fn run_update(
    args: &UpdateArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> Result<()> {
    let store = open_store(project_root)?;
    let actor = resolve_actor(&store, actor_flag)?;

    let status = args.status.as_deref().map(str::parse::<Status>).transpose()?;
    let priority = args
        .priority
        .as_deref()
        .map(str::parse::<Priority>)
        .transpose()?;
    let area_id = if args.clear_area {
        Some(None)
    } else {
        args.area.map(Some)
    };
    let sub_area = if args.clear_sub_area {
        Some(None)
    } else {
        args.sub_area.clone().map(Some)
    };

    let claim = engine::apply_transition(
        &store,
        &actor,
        args.id,
        &ChangeSet {
            status,
            priority,
            area_id,
            sub_area,
            reason: args.reason.clone(),
            resolution_description: args.resolution.clone(),
        },
    )?;
    render(output, &claim, print_claim)
}

fn print_claim(claim: &Claim, w: &mut dyn Write) -> std::io::Result<()> {
    kv(w, "claim", format!("#{}", claim.id))?;
    kv(w, "status", claim.status.as_str())?;
    kv(w, "priority", claim.priority.as_str())?;
    kv(
        w,
        "severity",
        dash(claim.severity.map(Severity::as_str)),
    )?;
    kv(w, "type", &claim.claim_type)?;
    kv(w, "project", claim.project_id.to_string())?;
    kv(
        w,
        "area",
        claim
            .area_id
            .map_or_else(|| "-".to_string(), |id| id.to_string()),
    )?;
    kv(w, "sub-area", dash(claim.sub_area.as_deref()))?;
    kv(w, "created", fmt_us(claim.created_at_us))?;
    kv(w, "updated", fmt_us(claim.updated_at_us))?;
    if let Some(resolved_at_us) = claim.resolved_at_us {
        kv(w, "resolved", fmt_us(resolved_at_us))?;
    }
    if let Some(resolution) = &claim.resolution_description {
        kv(w, "resolution", resolution)?;
    }
    if let Some(rating) = claim.client_rating {
        kv(w, "rating", format!("{rating}/5"))?;
    }
    writeln!(w)?;
    writeln!(w, "{}", claim.description)
}
