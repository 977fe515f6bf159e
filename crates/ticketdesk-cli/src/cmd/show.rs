//! `td show`: display one ticket with its relatives and the follow-ups the
//! current actor may see.

use clap::Args;
use std::io::{self, Write};
use std::path::Path;
use ticketdesk_core::listing::TicketDetail;
use ticketdesk_core::model::{FollowUp, Visibility};
use ticketdesk_core::ticket_detail;

use crate::cmd;
use crate::output::{OutputMode, format_timestamp, pretty_kv, pretty_rule, pretty_section, render};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Ticket id to display.
    pub id: i64,
}

/// Write one follow-up as a short block for human output.
pub fn write_follow_up(w: &mut dyn Write, entry: &FollowUp) -> io::Result<()> {
    let marker = match entry.visibility {
        Visibility::Public => "",
        Visibility::Internal => " [internal]",
    };
    writeln!(
        w,
        "{} {} ({}){marker}",
        format_timestamp(entry.created_at_us),
        entry.author,
        entry.action
    )?;
    for line in entry.body.lines() {
        writeln!(w, "    {line}")?;
    }
    Ok(())
}

fn write_detail(detail: &TicketDetail, mode: OutputMode, w: &mut dyn Write) -> io::Result<()> {
    let ticket = &detail.ticket;
    if mode == OutputMode::Text {
        cmd::write_ticket_line(w, ticket)?;
        for entry in &detail.comments {
            writeln!(
                w,
                "{}\t{}\t{}\t{}",
                entry.id,
                entry.action,
                entry.author,
                cmd::first_line(&entry.body)
            )?;
        }
        return Ok(());
    }

    pretty_section(w, &format!("#{} {}", ticket.id, cmd::first_line(&ticket.description)))?;
    cmd::write_ticket_fields(w, ticket)?;

    writeln!(w)?;
    writeln!(w, "{}", ticket.description)?;

    if let Some(parent) = &detail.parent {
        writeln!(w)?;
        pretty_kv(
            w,
            "Split from",
            format!("#{} ({})", parent.id, parent.status),
        )?;
    }

    if !detail.children.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Children")?;
        for child in &detail.children {
            writeln!(
                w,
                "#{} [{}] {}",
                child.id,
                child.status,
                cmd::first_line(&child.description)
            )?;
        }
    }

    writeln!(w)?;
    pretty_section(w, &format!("Follow-ups ({})", detail.comments.len()))?;
    for entry in &detail.comments {
        write_follow_up(w, entry)?;
    }
    pretty_rule(w)
}

/// Execute `td show <id>`.
///
/// # Errors
///
/// Returns an error if the ticket does not exist or rendering fails.
pub fn run_show(
    args: &ShowArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let project = cmd::open_project(project_root, output)?;
    let actor = cmd::current_actor(&project.conn, actor_flag, output)?;

    let detail = ticket_detail(&project.conn, &actor, args.id).map_err(|e| cmd::fail(output, e))?;
    render(output, &detail, write_detail)
}
