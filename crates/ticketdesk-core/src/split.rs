//! Splitting one ticket into two linked children.

use rusqlite::{Connection, Transaction};

use crate::config::{CommentConfig, TicketConfig};
use crate::comments::append_follow_up;
use crate::db::{self, query, records};
use crate::error::TicketError;
use crate::lifecycle::check_state;
use crate::model::{
    Actor, ChildSpec, FollowUpAction, NewFollowUp, Priority, Status, Ticket, TicketAction,
    TicketType, Visibility,
};
use crate::policy;
use crate::tickets::{load_ticket, normalize_tags, validate_application, validate_description};
use crate::users;

/// A child spec with every field resolved against the parent.
#[derive(Debug)]
struct ResolvedChild {
    ticket_type: TicketType,
    priority: Priority,
    application: String,
    assigned_to: Option<String>,
    description: String,
    tags: Vec<String>,
}

fn resolve_child(
    tx: &Transaction<'_>,
    parent: &Ticket,
    spec: &ChildSpec,
    limits: &TicketConfig,
) -> Result<ResolvedChild, TicketError> {
    let application = match spec.application.as_deref() {
        Some(application) => validate_application(application)?,
        None => parent.application.clone(),
    };
    let description = match spec.description.as_deref() {
        Some(description) => validate_description(description, limits)?,
        None => parent.description.clone(),
    };
    let tags = match spec.tags.as_deref() {
        Some(tags) => normalize_tags(tags)?,
        None => parent.tags.clone(),
    };

    let assigned_to = match spec.assigned_to.as_deref().map(str::trim) {
        Some(name) => Some(
            query::get_user(tx, name)?
                .ok_or_else(|| TicketError::UserNotFound(name.to_string()))?
                .username,
        ),
        None => parent.assigned_to.clone(),
    };

    Ok(ResolvedChild {
        ticket_type: spec.ticket_type.unwrap_or(parent.ticket_type),
        priority: spec.priority.unwrap_or(parent.priority),
        application,
        assigned_to,
        description,
        tags,
    })
}

fn insert_child(
    tx: &Transaction<'_>,
    parent: &Ticket,
    child: &ResolvedChild,
    now_us: i64,
) -> Result<i64, TicketError> {
    let child_id = records::insert_ticket(
        tx,
        &records::TicketRow {
            ticket_type: child.ticket_type,
            priority: child.priority,
            application: &child.application,
            description: &child.description,
            submitted_by: &parent.submitted_by,
            assigned_to: child.assigned_to.as_deref(),
            parent_id: Some(parent.id),
            created_at_us: now_us,
        },
    )?;
    records::replace_tags(tx, child_id, &child.tags)?;
    Ok(child_id)
}

/// Close `parent_id` as `split` and create two children from `first` and
/// `second`.
///
/// Unset child fields inherit from the parent, including its submitter,
/// assignee and tags. Children start as `new` with no votes and an empty
/// follow-up log. The parent gets one public follow-up naming the children.
/// All writes commit together.
///
/// # Errors
///
/// - [`TicketError::Authorization`] unless the actor is an administrator
/// - [`TicketError::TicketNotFound`] for an unknown parent
/// - [`TicketError::InvalidState`] if the parent is not open
/// - [`TicketError::Validation`] / [`TicketError::UserNotFound`] for a bad child spec
pub fn split_ticket(
    conn: &mut Connection,
    actor: &Actor,
    parent_id: i64,
    first: &ChildSpec,
    second: &ChildSpec,
    limits: &TicketConfig,
) -> Result<(Ticket, Ticket), TicketError> {
    policy::require(policy::can_administer(actor), actor, "split")?;

    let tx = db::write_tx(conn)?;
    let parent = load_ticket(&tx, parent_id)?;
    check_state(&parent, TicketAction::Split)?;
    users::ensure_registered(&tx, actor)?;
    let first = resolve_child(&tx, &parent, first, limits)?;
    let second = resolve_child(&tx, &parent, second, limits)?;

    let now = db::now_us();
    let first_id = insert_child(&tx, &parent, &first, now)?;
    let second_id = insert_child(&tx, &parent, &second, now)?;

    append_follow_up(
        &tx,
        NewFollowUp {
            ticket_id: parent.id,
            author: actor.username().unwrap_or_default().to_string(),
            body: format!("Ticket split into #{first_id} and #{second_id}."),
            visibility: Visibility::Public,
            action: FollowUpAction::Split,
        },
        &CommentConfig::default(),
    )?;
    records::set_status(&tx, parent.id, Status::Split, None, now)?;

    let first = load_ticket(&tx, first_id)?;
    let second = load_ticket(&tx, second_id)?;
    tx.commit()?;

    tracing::info!(
        ticket_id = parent_id,
        actor = %actor,
        first_child = first_id,
        second_child = second_id,
        "split ticket"
    );
    Ok((first, second))
}
