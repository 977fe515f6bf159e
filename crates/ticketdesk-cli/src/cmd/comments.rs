//! `td comments`: list the follow-ups on a ticket, newest first.
//!
//! Internal entries only appear for administrators and the submitter.

use clap::Args;
use std::path::Path;
use ticketdesk_core::list_comments;

use crate::cmd;
use crate::cmd::show::write_follow_up;
use crate::output::{OutputMode, pretty_section, render};

#[derive(Args, Debug)]
pub struct CommentsArgs {
    /// Ticket id.
    pub id: i64,
}

pub fn run_comments(
    args: &CommentsArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let project = cmd::open_project(project_root, output)?;
    let actor = cmd::current_actor(&project.conn, actor_flag, output)?;

    let entries = list_comments(&project.conn, &actor, args.id).map_err(|e| cmd::fail(output, e))?;

    render(output, &entries, |entries, mode, w| {
        if mode == OutputMode::Pretty {
            pretty_section(w, &format!("Ticket #{} follow-ups ({})", args.id, entries.len()))?;
        }
        for entry in entries {
            write_follow_up(w, entry)?;
        }
        Ok(())
    })
}
