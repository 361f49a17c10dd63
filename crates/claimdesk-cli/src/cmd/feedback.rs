//! `claimdesk feedback` — the client feedback conversation.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::io::Write;
use std::path::Path;

use claimdesk_core::feedback;

use crate::actor::resolve_actor;
use crate::cmd::open_store;
use crate::output::{OutputMode, fmt_us, render};

#[derive(Args, Debug)]
pub struct FeedbackArgs {
    #[command(subcommand)]
    pub command: FeedbackCommand,
}

#[derive(Subcommand, Debug)]
pub enum FeedbackCommand {
    #[command(
        about = "Submit feedback on a claim you own",
        after_help = "EXAMPLES:\n    # Progress comment while work is ongoing\n    claimdesk feedback submit 7 --message \"Still seeing drops\"\n\n    # Final rating once resolved\n    claimdesk feedback submit 7 --rating 5 --message \"Fast fix\""
    )]
    Submit(FeedbackSubmitArgs),

    #[command(about = "Show the feedback conversation for a claim")]
    List(FeedbackListArgs),
}

#[derive(Args, Debug)]
pub struct FeedbackSubmitArgs {
    /// Claim id.
    pub id: i64,

    /// Rating 1-5; only accepted once the claim is resolved.
    #[arg(long)]
    pub rating: Option<i64>,

    /// Feedback text; required while the claim is in progress.
    #[arg(long)]
    pub message: Option<String>,
}

#[derive(Args, Debug)]
pub struct FeedbackListArgs {
    /// Claim id.
    pub id: i64,
}

pub fn run_feedback(
    args: &FeedbackArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> Result<()> {
    match &args.command {
        FeedbackCommand::Submit(args) => run_submit(args, actor_flag, output, project_root),
        FeedbackCommand::List(args) => run_list(args, output, project_root),
    }
}

fn run_submit(
    args: &FeedbackSubmitArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> Result<()> {
    let store = open_store(project_root)?;
    let actor = resolve_actor(&store, actor_flag)?;
    let (_claim, message) = feedback::submit_feedback(
        &store,
        args.id,
        actor.id,
        args.rating,
        args.message.as_deref(),
    )?;
    render(output, &message, |message, w| {
        writeln!(
            w,
            "recorded {} feedback on claim #{}",
            message.kind.as_str(),
            message.claim_id
        )
    })
}

fn run_list(args: &FeedbackListArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let store = open_store(project_root)?;
    let messages = feedback::list_feedback(&store, args.id)?;
    render(output, &messages, |messages, w| {
        for message in messages {
            let rating = message
                .rating
                .map_or_else(String::new, |r| format!(" [{r}/5]"));
            writeln!(
                w,
                "{}  {:<8}{} {}",
                fmt_us(message.created_at_us),
                message.kind.as_str(),
                rating,
                message.message.as_deref().unwrap_or(""),
            )?;
        }
        Ok(())
    })
}
