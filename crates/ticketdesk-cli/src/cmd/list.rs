//! `td list`: list tickets with filtering and paging.

use clap::{Args, ValueEnum};
use std::io::Write;
use std::path::Path;
use ticketdesk_core::listing::{self, TicketPage};
use ticketdesk_core::model::{Priority, Status, TicketType};
use ticketdesk_core::{Scope, TicketFilter, UserRole};

use crate::cmd;
use crate::output::{OutputMode, pretty_rule, pretty_section, render};

/// How `--user` relates to a ticket.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum RoleArg {
    Submitted,
    Assigned,
    Either,
}

impl From<RoleArg> for UserRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Submitted => Self::SubmittedBy,
            RoleArg::Assigned => Self::AssignedTo,
            RoleArg::Either => Self::Either,
        }
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only open tickets (new, accepted, assigned, reopened).
    #[arg(long, conflicts_with = "closed")]
    pub open: bool,

    /// Only closed tickets (closed, duplicate, split).
    #[arg(long)]
    pub closed: bool,

    /// Filter by exact status.
    #[arg(short, long)]
    pub status: Option<Status>,

    /// Filter by ticket type.
    #[arg(long = "type", short = 't')]
    pub ticket_type: Option<TicketType>,

    /// Filter by priority.
    #[arg(short, long)]
    pub priority: Option<Priority>,

    /// Filter by application.
    #[arg(short, long)]
    pub application: Option<String>,

    /// Filter by tag.
    #[arg(long)]
    pub tag: Option<String>,

    /// Case-insensitive text search in descriptions.
    #[arg(short, long)]
    pub query: Option<String>,

    /// Only tickets related to this user.
    #[arg(short, long)]
    pub user: Option<String>,

    /// How `--user` relates to the ticket [default: either].
    #[arg(long, value_enum, requires = "user")]
    pub role: Option<RoleArg>,

    /// Only children split from this ticket.
    #[arg(long)]
    pub parent: Option<i64>,

    /// Maximum tickets to show (defaults to the configured page size).
    #[arg(short = 'n', long)]
    pub limit: Option<u32>,

    /// Tickets to skip before the page starts.
    #[arg(long)]
    pub offset: Option<u32>,
}

impl ListArgs {
    fn to_filter(&self) -> TicketFilter {
        let scope = if self.open {
            Scope::Open
        } else if self.closed {
            Scope::Closed
        } else {
            Scope::All
        };
        TicketFilter {
            scope,
            status: self.status,
            ticket_type: self.ticket_type,
            priority: self.priority,
            application: self.application.clone(),
            tag: self.tag.clone(),
            query: self.query.clone(),
            user: self.user.clone(),
            role: self.role.map_or(UserRole::Either, UserRole::from),
            parent_id: self.parent,
            limit: self.limit,
            offset: self.offset,
        }
    }
}

pub fn run_list(args: &ListArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let project = cmd::open_project(project_root, output)?;
    let page = listing::list_page(&project.conn, &args.to_filter(), &project.config.listing)
        .map_err(|e| cmd::fail(output, e))?;

    render(output, &page, |page: &TicketPage, mode, w| {
        if mode == OutputMode::Pretty {
            let first = if page.tickets.is_empty() {
                0
            } else {
                u64::from(page.offset) + 1
            };
            let last = u64::from(page.offset) + page.tickets.len() as u64;
            pretty_section(w, &format!("Tickets {first}-{last} of {}", page.total))?;
            for ticket in &page.tickets {
                writeln!(
                    w,
                    "#{:<5} {:<9} {:<8} {:<14} {}",
                    ticket.id,
                    ticket.status.as_str(),
                    ticket.priority.as_str(),
                    ticket.application,
                    cmd::first_line(&ticket.description)
                )?;
            }
            pretty_rule(w)
        } else {
            for ticket in &page.tickets {
                cmd::write_ticket_line(w, ticket)?;
            }
            Ok(())
        }
    })
}
