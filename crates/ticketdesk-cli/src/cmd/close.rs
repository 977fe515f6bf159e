//! `td close`: close an open ticket, optionally as a duplicate.
//!
//! A comment is mandatory. Closing as a duplicate links the ticket to the
//! original and sets its status to `duplicate` instead of `closed`.

use clap::Args;
use std::path::Path;
use ticketdesk_core::{Transition, apply_transition};

use crate::cmd;
use crate::output::OutputMode;

#[derive(Args, Debug)]
pub struct CloseArgs {
    /// Ticket id to close.
    pub id: i64,

    /// Why the ticket is being closed.
    #[arg(long, short = 'm')]
    pub comment: String,

    /// Close as a duplicate of this ticket.
    #[arg(long, value_name = "ID")]
    pub duplicate_of: Option<i64>,
}

pub fn run_close(
    args: &CloseArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut project = cmd::open_project(project_root, output)?;
    let actor = cmd::current_actor(&project.conn, actor_flag, output)?;

    let transition = Transition::Close {
        comment: args.comment.clone(),
        duplicate_of: args.duplicate_of,
    };
    let ticket = apply_transition(
        &mut project.conn,
        &actor,
        args.id,
        transition,
        &project.config.comments,
    )
    .map_err(|e| cmd::fail(output, e))?;

    let headline = match ticket.duplicate_of {
        Some(original) => format!("Closed ticket #{} as a duplicate of #{original}", ticket.id),
        None => format!("Closed ticket #{}", ticket.id),
    };
    cmd::render_ticket(output, &ticket, &headline)
}
