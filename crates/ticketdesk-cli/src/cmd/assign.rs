//! `td assign`: hand an open ticket to a registered user.

use clap::Args;
use std::path::Path;
use ticketdesk_core::{Transition, apply_transition};

use crate::cmd;
use crate::output::OutputMode;

#[derive(Args, Debug)]
pub struct AssignArgs {
    /// Ticket id to assign.
    pub id: i64,

    /// Username of the new assignee.
    pub assignee: String,

    /// Comment to record instead of the generated one.
    #[arg(long, short = 'm')]
    pub comment: Option<String>,
}

pub fn run_assign(
    args: &AssignArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut project = cmd::open_project(project_root, output)?;
    let actor = cmd::current_actor(&project.conn, actor_flag, output)?;

    let transition = Transition::Assign {
        to: args.assignee.clone(),
        comment: args.comment.clone(),
    };
    let ticket = apply_transition(
        &mut project.conn,
        &actor,
        args.id,
        transition,
        &project.config.comments,
    )
    .map_err(|e| cmd::fail(output, e))?;

    cmd::render_ticket(
        output,
        &ticket,
        &format!("Assigned ticket #{} to {}", ticket.id, args.assignee),
    )
}
