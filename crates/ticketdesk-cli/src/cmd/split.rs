//! `td split`: split one open ticket into two new children.
//!
//! Every child field left unset inherits the parent's value. The parent
//! ends up `split` and can no longer change status.

use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use ticketdesk_core::model::{ChildSpec, Priority, Ticket, TicketType};
use ticketdesk_core::split_ticket;

use crate::cmd;
use crate::output::{OutputMode, pretty_section, render};

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Ticket id to split.
    pub id: i64,

    /// Type of the first child.
    #[arg(long, help_heading = "First child")]
    pub first_type: Option<TicketType>,
    /// Priority of the first child.
    #[arg(long, help_heading = "First child")]
    pub first_priority: Option<Priority>,
    /// Application of the first child.
    #[arg(long, help_heading = "First child")]
    pub first_application: Option<String>,
    /// Assignee of the first child.
    #[arg(long, help_heading = "First child")]
    pub first_assign: Option<String>,
    /// Description of the first child.
    #[arg(long, help_heading = "First child")]
    pub first_description: Option<String>,
    /// Tags of the first child (repeatable).
    #[arg(long, value_name = "TAG", help_heading = "First child")]
    pub first_tag: Vec<String>,

    /// Type of the second child.
    #[arg(long, help_heading = "Second child")]
    pub second_type: Option<TicketType>,
    /// Priority of the second child.
    #[arg(long, help_heading = "Second child")]
    pub second_priority: Option<Priority>,
    /// Application of the second child.
    #[arg(long, help_heading = "Second child")]
    pub second_application: Option<String>,
    /// Assignee of the second child.
    #[arg(long, help_heading = "Second child")]
    pub second_assign: Option<String>,
    /// Description of the second child.
    #[arg(long, help_heading = "Second child")]
    pub second_description: Option<String>,
    /// Tags of the second child (repeatable).
    #[arg(long, value_name = "TAG", help_heading = "Second child")]
    pub second_tag: Vec<String>,
}

fn tags_override(tags: &[String]) -> Option<Vec<String>> {
    (!tags.is_empty()).then(|| tags.to_vec())
}

impl SplitArgs {
    fn first(&self) -> ChildSpec {
        ChildSpec {
            ticket_type: self.first_type,
            priority: self.first_priority,
            application: self.first_application.clone(),
            assigned_to: self.first_assign.clone(),
            description: self.first_description.clone(),
            tags: tags_override(&self.first_tag),
        }
    }

    fn second(&self) -> ChildSpec {
        ChildSpec {
            ticket_type: self.second_type,
            priority: self.second_priority,
            application: self.second_application.clone(),
            assigned_to: self.second_assign.clone(),
            description: self.second_description.clone(),
            tags: tags_override(&self.second_tag),
        }
    }
}

#[derive(Debug, Serialize)]
struct SplitResult {
    parent_id: i64,
    children: [Ticket; 2],
}

pub fn run_split(
    args: &SplitArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut project = cmd::open_project(project_root, output)?;
    let actor = cmd::current_actor(&project.conn, actor_flag, output)?;

    let (first, second) = split_ticket(
        &mut project.conn,
        &actor,
        args.id,
        &args.first(),
        &args.second(),
        &project.config.tickets,
    )
    .map_err(|e| cmd::fail(output, e))?;

    let result = SplitResult {
        parent_id: args.id,
        children: [first, second],
    };
    render(output, &result, |result, mode, w| {
        if mode == OutputMode::Pretty {
            pretty_section(
                w,
                &format!(
                    "Split ticket #{} into #{} and #{}",
                    result.parent_id, result.children[0].id, result.children[1].id
                ),
            )?;
            for child in &result.children {
                writeln!(w)?;
                writeln!(w, "#{} {}", child.id, cmd::first_line(&child.description))?;
                cmd::write_ticket_fields(w, child)?;
            }
            Ok(())
        } else {
            for child in &result.children {
                cmd::write_ticket_line(w, child)?;
            }
            Ok(())
        }
    })
}
