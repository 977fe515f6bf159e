//! Command handlers. Each module owns one subcommand's `Args` and `run_*`.

pub mod accept;
pub mod assign;
pub mod close;
pub mod comment;
pub mod comments;
pub mod create;
pub mod filters;
pub mod init;
pub mod list;
pub mod reopen;
pub mod show;
pub mod split;
pub mod tags;
pub mod update;
pub mod user;
pub mod vote;

use std::io::{self, Write};
use std::path::Path;

use rusqlite::Connection;
use ticketdesk_core::config::{self, ProjectConfig};
use ticketdesk_core::model::{Actor, Ticket};
use ticketdesk_core::{ErrorCode, TicketError, db};

use crate::actor;
use crate::output::{
    CliError, OutputMode, format_timestamp, pretty_kv, pretty_section, render, render_error,
};

/// An opened ticket store plus the project config it was opened with.
pub struct Project {
    pub conn: Connection,
    pub config: ProjectConfig,
}

/// Open the store under `project_root`, rendering a not-initialized error
/// when `td init` has not been run.
pub fn open_project(project_root: &Path, output: OutputMode) -> anyhow::Result<Project> {
    let path = config::store_path(project_root);
    if !path.exists() {
        let code = ErrorCode::NotInitialized;
        render_error(
            output,
            &CliError::with_details(
                format!("no ticket store at {}", path.display()),
                code.hint().unwrap_or_default(),
                code.code(),
            ),
        )?;
        anyhow::bail!("{}", code.message());
    }

    let config = config::load_project_config(project_root)?;
    let conn = db::open_store(&path, config.store.busy_timeout())?;
    Ok(Project { conn, config })
}

/// Render a core error on stderr and hand it back for `?` propagation.
pub fn fail(output: OutputMode, err: TicketError) -> anyhow::Error {
    if let Err(render_err) = render_error(output, &CliError::from(&err)) {
        return render_err;
    }
    anyhow::Error::new(err)
}

/// Resolve the acting user, rendering unknown names as errors.
pub fn current_actor(
    conn: &Connection,
    actor_flag: Option<&str>,
    output: OutputMode,
) -> anyhow::Result<Actor> {
    actor::resolve_actor(conn, actor_flag).map_err(|e| fail(output, e))
}

pub fn write_ticket_fields(w: &mut dyn Write, ticket: &Ticket) -> io::Result<()> {
    pretty_kv(w, "Status", ticket.status.as_str())?;
    pretty_kv(w, "Type", ticket.ticket_type.label())?;
    pretty_kv(w, "Priority", ticket.priority.as_str())?;
    pretty_kv(w, "Application", &ticket.application)?;
    pretty_kv(w, "Submitter", &ticket.submitted_by)?;
    pretty_kv(w, "Assignee", ticket.assigned_to.as_deref().unwrap_or("-"))?;
    pretty_kv(w, "Votes", ticket.vote_count.to_string())?;
    if !ticket.tags.is_empty() {
        pretty_kv(w, "Tags", ticket.tags.join(", "))?;
    }
    if let Some(parent) = ticket.parent_id {
        pretty_kv(w, "Parent", format!("#{parent}"))?;
    }
    if let Some(original) = ticket.duplicate_of {
        pretty_kv(w, "Duplicate of", format!("#{original}"))?;
    }
    pretty_kv(w, "Created", format_timestamp(ticket.created_at_us))?;
    pretty_kv(w, "Updated", format_timestamp(ticket.updated_at_us))
}

/// One tab-separated line per ticket for text output.
pub fn write_ticket_line(w: &mut dyn Write, ticket: &Ticket) -> io::Result<()> {
    writeln!(
        w,
        "{}\t{}\t{}\t{}\t{}\t{}",
        ticket.id,
        ticket.status,
        ticket.priority,
        ticket.application,
        ticket.assigned_to.as_deref().unwrap_or("-"),
        first_line(&ticket.description)
    )
}

/// Render a ticket after a write, headed by what just happened.
pub fn render_ticket(output: OutputMode, ticket: &Ticket, headline: &str) -> anyhow::Result<()> {
    render(output, ticket, |ticket, mode, w| match mode {
        OutputMode::Pretty => {
            pretty_section(w, headline)?;
            write_ticket_fields(w, ticket)
        }
        OutputMode::Text | OutputMode::Json => write_ticket_line(w, ticket),
    })
}

pub fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_project_requires_init() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_project(dir.path(), OutputMode::Json)
            .err()
            .expect("missing store must fail");
        assert_eq!(err.to_string(), ErrorCode::NotInitialized.message());
    }

    #[test]
    fn first_line_of_multiline_text() {
        assert_eq!(first_line("one\ntwo"), "one");
        assert_eq!(first_line(""), "");
    }
}
