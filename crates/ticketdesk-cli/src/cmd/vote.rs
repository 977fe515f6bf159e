//! `td vote`: cast one vote for a ticket.

use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use ticketdesk_core::cast_vote;
use ticketdesk_core::tickets::load_ticket;

use crate::cmd;
use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct VoteArgs {
    /// Ticket id to vote for.
    pub id: i64,
}

#[derive(Debug, Serialize)]
struct VoteResult {
    ticket_id: i64,
    /// `false` when the actor had already voted.
    recorded: bool,
    vote_count: u32,
}

pub fn run_vote(
    args: &VoteArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut project = cmd::open_project(project_root, output)?;
    let actor = cmd::current_actor(&project.conn, actor_flag, output)?;

    let recorded =
        cast_vote(&mut project.conn, &actor, args.id).map_err(|e| cmd::fail(output, e))?;
    let ticket = load_ticket(&project.conn, args.id).map_err(|e| cmd::fail(output, e))?;

    let result = VoteResult {
        ticket_id: ticket.id,
        recorded,
        vote_count: ticket.vote_count,
    };
    render(output, &result, |result, mode, w| {
        if mode == OutputMode::Pretty {
            let verb = if result.recorded {
                "Voted for"
            } else {
                "Already voted for"
            };
            writeln!(
                w,
                "{verb} ticket #{} ({} votes)",
                result.ticket_id, result.vote_count
            )
        } else {
            writeln!(
                w,
                "{}\t{}\t{}",
                result.ticket_id, result.recorded, result.vote_count
            )
        }
    })
}
