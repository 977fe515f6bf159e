//! `td create`: submit a new ticket.

use clap::Args;
use std::path::Path;
use ticketdesk_core::create_ticket;
use ticketdesk_core::model::{NewTicket, Priority, TicketType};

use crate::cmd;
use crate::output::OutputMode;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Application or component the ticket concerns.
    #[arg(long, short = 'a')]
    pub application: String,

    /// What is wrong or what is wanted.
    #[arg(long, short = 'd')]
    pub description: String,

    /// Ticket type: bug, feature or task.
    #[arg(long = "type", short = 't', default_value = "bug")]
    pub ticket_type: TicketType,

    /// Priority: critical, high, normal, low or minor (or 1-5).
    #[arg(long, short = 'p', default_value = "normal")]
    pub priority: Priority,

    /// Tag to attach (repeatable).
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
}

pub fn run_create(
    args: &CreateArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut project = cmd::open_project(project_root, output)?;
    let actor = cmd::current_actor(&project.conn, actor_flag, output)?;

    let attributes = NewTicket {
        ticket_type: args.ticket_type,
        priority: args.priority,
        application: args.application.clone(),
        description: args.description.clone(),
        tags: args.tags.clone(),
    };
    let ticket = create_ticket(&mut project.conn, &actor, &attributes, &project.config.tickets)
        .map_err(|e| cmd::fail(output, e))?;

    cmd::render_ticket(output, &ticket, &format!("Created ticket #{}", ticket.id))
}
