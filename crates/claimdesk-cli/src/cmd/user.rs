//! `claimdesk user` — user directory administration.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::io::Write;
use std::path::Path;

use claimdesk_core::directory;
use claimdesk_core::store::entities::NewUser;
use claimdesk_core::Role;

use crate::cmd::open_store;
use crate::output::{OutputMode, render, render_success};

#[derive(Args, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    #[command(
        about = "Register a user",
        after_help = "EXAMPLES:\n    # An employee attached to an area\n    claimdesk user add eli@support.example --role employee --name \"Eli Ops\" --area 1\n\n    # A client\n    claimdesk user add cora@client.example --role client --company \"ACME\""
    )]
    Add(UserAddArgs),

    #[command(about = "List users")]
    List {
        /// Filter by role: admin, employee, or client.
        #[arg(long)]
        role: Option<String>,

        /// Include deactivated users.
        #[arg(long)]
        all: bool,
    },

    #[command(about = "Deactivate a user")]
    Deactivate { id: i64 },

    #[command(about = "Reactivate a user")]
    Reactivate { id: i64 },
}

#[derive(Args, Debug)]
pub struct UserAddArgs {
    /// Email address (unique, stored lowercased).
    pub email: String,

    /// Role: admin, employee, or client.
    #[arg(long)]
    pub role: String,

    /// Full display name.
    #[arg(long, default_value = "")]
    pub name: String,

    /// Area an employee belongs to.
    #[arg(long)]
    pub area: Option<i64>,

    /// Company a client belongs to.
    #[arg(long)]
    pub company: Option<String>,
}

pub fn run_user(args: &UserArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let store = open_store(project_root)?;
    match &args.command {
        UserCommand::Add(args) => {
            let user = directory::register_user(
                &store,
                &NewUser {
                    email: args.email.clone(),
                    full_name: args.name.clone(),
                    role: args.role.parse::<Role>()?,
                    area_id: args.area,
                    company_name: args.company.clone(),
                },
            )?;
            render(output, &user, |user, w| {
                writeln!(
                    w,
                    "#{} {} ({}) registered",
                    user.id,
                    user.display_name(),
                    user.role.as_str()
                )
            })
        }
        UserCommand::List { role, all } => {
            let role = role.as_deref().map(str::parse::<Role>).transpose()?;
            let users = store.list_users(role, !all)?;
            render(output, &users, |users, w| {
                for user in users {
                    let flag = if user.is_active { "" } else { " (inactive)" };
                    writeln!(
                        w,
                        "#{:<4} {:<10} {:<30} {}{}",
                        user.id,
                        user.role.as_str(),
                        user.email,
                        user.full_name,
                        flag
                    )?;
                }
                Ok(())
            })
        }
        UserCommand::Deactivate { id } => {
            store.set_user_active(*id, false)?;
            render_success(output, &format!("deactivated user #{id}"))
        }
        UserCommand::Reactivate { id } => {
            store.set_user_active(*id, true)?;
            render_success(output, &format!("reactivated user #{id}"))
        }
    }
}
