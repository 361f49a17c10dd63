//! `claimdesk backfill` — administrative repair of event timestamps.
//!
//! Exists for imported history whose clocks were wrong or missing. Only the
//! timestamp is rewritten; payloads are immutable.

use anyhow::{Context, Result};
use chrono::DateTime;
use clap::Args;
use std::path::Path;

use crate::cmd::open_store;
use crate::output::{OutputMode, render_success};

#[derive(Args, Debug)]
pub struct BackfillArgs {
    /// Event id to repair.
    pub event_id: i64,

    /// New creation time, RFC 3339 (e.g. 2026-03-01T09:00:00Z).
    pub created_at: String,
}

pub fn run_backfill(args: &BackfillArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let store = open_store(project_root)?;
    let created_at_us = DateTime::parse_from_rfc3339(&args.created_at)
        .with_context(|| format!("'{}' is not an RFC 3339 timestamp", args.created_at))?
        .timestamp_micros();
    store.backfill_event_timestamp(args.event_id, created_at_us)?;
    render_success(
        output,
        &format!("event #{} moved to {}", args.event_id, args.created_at),
    )
}
