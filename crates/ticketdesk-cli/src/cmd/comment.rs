//! `td comment`: append a public comment or an internal note.

use clap::Args;
use std::io::Write;
use std::path::Path;
use ticketdesk_core::add_comment;
use ticketdesk_core::model::Visibility;

use crate::cmd;
use crate::cmd::show::write_follow_up;
use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct CommentArgs {
    /// Ticket id to comment on.
    pub id: i64,

    /// Comment text.
    pub body: String,

    /// Hide the comment from everyone but administrators and the submitter.
    #[arg(long)]
    pub internal: bool,
}

impl CommentArgs {
    const fn visibility(&self) -> Visibility {
        if self.internal {
            Visibility::Internal
        } else {
            Visibility::Public
        }
    }
}

pub fn run_comment(
    args: &CommentArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut project = cmd::open_project(project_root, output)?;
    let actor = cmd::current_actor(&project.conn, actor_flag, output)?;

    let entry = add_comment(
        &mut project.conn,
        &actor,
        args.id,
        &args.body,
        args.visibility(),
        &project.config.comments,
    )
    .map_err(|e| cmd::fail(output, e))?;

    render(output, &entry, |entry, mode, w| {
        if mode == OutputMode::Pretty {
            write_follow_up(w, entry)
        } else {
            writeln!(w, "{}\t{}\t{}", entry.id, entry.ticket_id, entry.visibility)
        }
    })
}
