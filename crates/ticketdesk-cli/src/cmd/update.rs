//! `td update`: edit ticket attributes.

use clap::Args;
use std::path::Path;
use ticketdesk_core::model::{Priority, TicketType, TicketUpdate};
use ticketdesk_core::update_ticket;

use crate::cmd;
use crate::output::OutputMode;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Ticket id.
    pub id: i64,

    /// New ticket type.
    #[arg(long = "type", short = 't')]
    pub ticket_type: Option<TicketType>,

    /// New priority.
    #[arg(long, short = 'p')]
    pub priority: Option<Priority>,

    /// New application.
    #[arg(long, short = 'a')]
    pub application: Option<String>,

    /// New description.
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Replace the tags with these (repeatable).
    #[arg(long = "tag", value_name = "TAG", conflicts_with = "clear_tags")]
    pub tags: Vec<String>,

    /// Remove every tag.
    #[arg(long)]
    pub clear_tags: bool,
}

impl UpdateArgs {
    fn to_update(&self) -> TicketUpdate {
        let tags = if self.clear_tags {
            Some(Vec::new())
        } else if self.tags.is_empty() {
            None
        } else {
            Some(self.tags.clone())
        };
        TicketUpdate {
            ticket_type: self.ticket_type,
            priority: self.priority,
            application: self.application.clone(),
            description: self.description.clone(),
            tags,
        }
    }
}

pub fn run_update(
    args: &UpdateArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut project = cmd::open_project(project_root, output)?;
    let actor = cmd::current_actor(&project.conn, actor_flag, output)?;

    let ticket = update_ticket(
        &mut project.conn,
        &actor,
        args.id,
        &args.to_update(),
        &project.config.tickets,
    )
    .map_err(|e| cmd::fail(output, e))?;

    cmd::render_ticket(output, &ticket, &format!("Updated ticket #{}", ticket.id))
}
