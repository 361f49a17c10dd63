//! `claimdesk timeline` — the enriched event history for a claim.

use anyhow::Result;
use clap::Args;
use std::io::Write;
use std::path::Path;

use claimdesk_core::event::details::EventDetails;
use claimdesk_core::timeline;

use crate::cmd::open_store;
use crate::output::{OutputMode, fmt_us, render};

#[derive(Args, Debug)]
pub struct TimelineArgs {
    /// Claim id.
    pub id: i64,

    /// Show only the client-visible subset of the history.
    #[arg(long)]
    pub public: bool,
}

pub fn run_timeline(args: &TimelineArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let store = open_store(project_root)?;
    let events = timeline::list_events(&store, args.id, args.public)?;

    render(output, &events, |events, w| {
        for event in events {
            let actor = event.actor_name.as_deref().unwrap_or("system");
            writeln!(
                w,
                "{}  {:<16} {:<8} {}  {}",
                fmt_us(event.created_at_us),
                event.action.as_str(),
                event.visibility.as_str(),
                actor,
                summarize(&event.details),
            )?;
        }
        Ok(())
    })
}

fn summarize(details: &EventDetails) -> String {
    match details {
        EventDetails::Created(d) => format!("opened as {}", d.status.as_str()),
        EventDetails::StatusChanged(d) => format!("{} -> {}", d.from.as_str(), d.to.as_str()),
        EventDetails::PriorityChanged(d) => format!("{} -> {}", d.from.as_str(), d.to.as_str()),
        EventDetails::AreaChanged(d) => {
            let from = d.from_area_name.as_deref().unwrap_or("unassigned");
            let to = d.to_area_name.as_deref().unwrap_or("unassigned");
            match d.reason.as_deref() {
                Some(reason) => format!("{from} -> {to} ({reason})"),
                None => format!("{from} -> {to}"),
            }
        }
        EventDetails::SubAreaChanged(d) => format!(
            "{} -> {}",
            d.from.as_deref().unwrap_or("-"),
            d.to.as_deref().unwrap_or("-")
        ),
        EventDetails::Comment(d) => d.comment.clone(),
        EventDetails::ActionLogged(d) => d.description.clone(),
    }
}
