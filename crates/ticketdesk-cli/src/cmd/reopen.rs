//! `td reopen`: reopen a closed or duplicate ticket.

use clap::Args;
use std::path::Path;
use ticketdesk_core::{Transition, apply_transition};

use crate::cmd;
use crate::output::OutputMode;

#[derive(Args, Debug)]
pub struct ReopenArgs {
    /// Ticket id to reopen.
    pub id: i64,

    /// Why the ticket is being reopened.
    #[arg(long, short = 'm')]
    pub comment: String,
}

pub fn run_reopen(
    args: &ReopenArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut project = cmd::open_project(project_root, output)?;
    let actor = cmd::current_actor(&project.conn, actor_flag, output)?;

    let transition = Transition::Reopen {
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

    cmd::render_ticket(output, &ticket, &format!("Reopened ticket #{}", ticket.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reopen_args_parse() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: ReopenArgs,
        }
        let w = Wrapper::parse_from(["test", "12", "--comment", "Regressed in 2.4"]);
        assert_eq!(w.args.id, 12);
        assert_eq!(w.args.comment, "Regressed in 2.4");
        assert!(Wrapper::try_parse_from(["test", "12"]).is_err());
    }
}
