//! `td accept`: move an open ticket to accepted.

use clap::Args;
use std::path::Path;
use ticketdesk_core::{Transition, apply_transition};

use crate::cmd;
use crate::output::OutputMode;

#[derive(Args, Debug)]
pub struct AcceptArgs {
    /// Ticket id to accept.
    pub id: i64,

    /// Comment to record instead of the generated one.
    #[arg(long, short = 'm')]
    pub comment: Option<String>,
}

pub fn run_accept(
    args: &AcceptArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut project = cmd::open_project(project_root, output)?;
    let actor = cmd::current_actor(&project.conn, actor_flag, output)?;

    let transition = Transition::Accept {
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

    cmd::render_ticket(output, &ticket, &format!("Accepted ticket #{}", ticket.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_args_parse() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: AcceptArgs,
        }
        let w = Wrapper::parse_from(["test", "7"]);
        assert_eq!(w.args.id, 7);
        assert!(w.args.comment.is_none());

        let w = Wrapper::parse_from(["test", "7", "-m", "On it"]);
        assert_eq!(w.args.comment.as_deref(), Some("On it"));
    }
}
