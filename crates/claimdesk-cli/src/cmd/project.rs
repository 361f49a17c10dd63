//! `claimdesk project` — project administration.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::io::Write;
use std::path::Path;

use claimdesk_core::directory;

use crate::cmd::open_store;
use crate::output::{OutputMode, render, render_success};

#[derive(Args, Debug)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub command: ProjectCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    #[command(about = "Create a project owned by a client")]
    Add {
        name: String,
        /// Free-form project type label.
        #[arg(long = "type", default_value = "general")]
        project_type: String,
        /// Owning client's user id.
        #[arg(long)]
        client: i64,
    },

    #[command(about = "List projects")]
    List {
        /// Only projects owned by this client.
        #[arg(long)]
        client: Option<i64>,

        /// Include deactivated projects.
        #[arg(long)]
        all: bool,
    },

    #[command(about = "Deactivate a project")]
    Deactivate { id: i64 },
}

pub fn run_project(args: &ProjectArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let store = open_store(project_root)?;
    match &args.command {
        ProjectCommand::Add {
            name,
            project_type,
            client,
        } => {
            let project = directory::create_project(&store, name, project_type, *client)?;
            render(output, &project, |project, w| {
                writeln!(w, "#{} {} ({})", project.id, project.name, project.project_type)
            })
        }
        ProjectCommand::List { client, all } => {
            let projects = store.list_projects(*client, !all)?;
            render(output, &projects, |projects, w| {
                for project in projects {
                    let flag = if project.is_active { "" } else { " (inactive)" };
                    writeln!(
                        w,
                        "#{:<4} {:<30} {:<12} client #{}{}",
                        project.id, project.name, project.project_type, project.client_id, flag
                    )?;
                }
                Ok(())
            })
        }
        ProjectCommand::Deactivate { id } => {
            store.set_project_active(*id, false)?;
            render_success(output, &format!("deactivated project #{id}"))
        }
    }
}
