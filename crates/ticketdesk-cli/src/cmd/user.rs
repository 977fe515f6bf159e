//! `td user`: register users and list them.
//!
//! The store keeps its own user table; who may run this command is up to
//! whoever controls the project directory.

use clap::{Args, Subcommand};
use std::io::Write;
use std::path::Path;
use ticketdesk_core::users;

use crate::cmd;
use crate::output::{OutputMode, pretty_section, render};

#[derive(Args, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Register a user, or update an existing user's admin flag.
    Add {
        /// Username (letters, digits and `.@+-_`).
        name: String,

        /// Grant administrator privileges.
        #[arg(long)]
        admin: bool,
    },
    /// List registered users.
    List,
}

pub fn run_user(args: &UserArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let mut project = cmd::open_project(project_root, output)?;

    match &args.command {
        UserCommand::Add { name, admin } => {
            let user = users::register_user(&mut project.conn, name, *admin)
                .map_err(|e| cmd::fail(output, e))?;
            render(output, &user, |user, _, w| {
                let role = if user.is_admin { "admin" } else { "user" };
                writeln!(w, "{}\t{role}", user.username)
            })
        }
        UserCommand::List => {
            let all = users::list_users(&project.conn).map_err(|e| cmd::fail(output, e))?;
            render(output, &all, |all, mode, w| {
                if mode == OutputMode::Pretty {
                    pretty_section(w, &format!("{} users", all.len()))?;
                }
                for user in all {
                    let role = if user.is_admin { "admin" } else { "user" };
                    writeln!(w, "{}\t{role}", user.username)?;
                }
                Ok(())
            })
        }
    }
}
