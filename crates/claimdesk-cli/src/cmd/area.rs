//! `claimdesk area` — area and sub-area administration.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::io::Write;
use std::path::Path;

use claimdesk_core::directory;
use claimdesk_core::Area;

use crate::cmd::open_store;
use crate::output::{OutputMode, kv, render, render_success};

#[derive(Args, Debug)]
pub struct AreaArgs {
    #[command(subcommand)]
    pub command: AreaCommand,
}

#[derive(Subcommand, Debug)]
pub enum AreaCommand {
    #[command(about = "Create an area")]
    Add {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },

    #[command(about = "List areas")]
    List {
        /// Include deactivated areas.
        #[arg(long)]
        all: bool,
    },

    #[command(about = "Show one area with its sub-areas")]
    Show { id: i64 },

    #[command(about = "Deactivate an area (refused while employees are attached)")]
    Deactivate { id: i64 },

    #[command(about = "Reactivate an area")]
    Reactivate { id: i64 },

    #[command(subcommand, about = "Manage an area's sub-areas")]
    Sub(SubAreaCommand),
}

#[derive(Subcommand, Debug)]
pub enum SubAreaCommand {
    #[command(about = "Append a sub-area to an area")]
    Add { area_id: i64, name: String },

    #[command(about = "Rename a sub-area, keeping its position")]
    Rename {
        area_id: i64,
        sub_area_id: i64,
        name: String,
    },

    #[command(about = "Remove a sub-area")]
    Remove { area_id: i64, sub_area_id: i64 },
}

pub fn run_area(args: &AreaArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let store = open_store(project_root)?;
    match &args.command {
        AreaCommand::Add { name, description } => {
            let area = store.create_area(name, description)?;
            render(output, &area, print_area)
        }
        AreaCommand::List { all } => {
            let areas = store.list_areas(!all)?;
            render(output, &areas, |areas, w| {
                for area in areas {
                    let flag = if area.is_active { "" } else { " (inactive)" };
                    writeln!(
                        w,
                        "#{:<4} {}{} — {} sub-areas",
                        area.id,
                        area.name,
                        flag,
                        area.sub_areas.len()
                    )?;
                }
                Ok(())
            })
        }
        AreaCommand::Show { id } => {
            let area = store
                .get_area(*id)?
                .with_context(|| format!("no area with id {id}"))?;
            render(output, &area, print_area)
        }
        AreaCommand::Deactivate { id } => {
            directory::deactivate_area(&store, *id)?;
            render_success(output, &format!("deactivated area #{id}"))
        }
        AreaCommand::Reactivate { id } => {
            directory::reactivate_area(&store, *id)?;
            render_success(output, &format!("reactivated area #{id}"))
        }
        AreaCommand::Sub(sub) => run_sub(&store, sub, output),
    }
}

fn run_sub(
    store: &claimdesk_core::Store,
    command: &SubAreaCommand,
    output: OutputMode,
) -> Result<()> {
    match command {
        SubAreaCommand::Add { area_id, name } => {
            let sub = directory::add_sub_area(store, *area_id, name)?;
            render_success(
                output,
                &format!("added sub-area '{}' (#{}) to area #{area_id}", sub.name, sub.id),
            )
        }
        SubAreaCommand::Rename {
            area_id,
            sub_area_id,
            name,
        } => {
            directory::rename_sub_area(store, *area_id, *sub_area_id, name)?;
            render_success(output, &format!("renamed sub-area #{sub_area_id} to '{name}'"))
        }
        SubAreaCommand::Remove {
            area_id,
            sub_area_id,
        } => {
            directory::remove_sub_area(store, *area_id, *sub_area_id)?;
            render_success(output, &format!("removed sub-area #{sub_area_id}"))
        }
    }
}

fn print_area(area: &Area, w: &mut dyn Write) -> std::io::Result<()> {
    kv(w, "area", format!("#{}", area.id))?;
    kv(w, "name", &area.name)?;
    kv(w, "active", if area.is_active { "yes" } else { "no" })?;
    if !area.description.is_empty() {
        kv(w, "description", &area.description)?;
    }
    for sub in &area.sub_areas {
        writeln!(w, "  - #{} {}", sub.id, sub.name)?;
    }
    Ok(())
}
