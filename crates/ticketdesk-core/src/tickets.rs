//! Ticket submission and attribute edits.

use std::collections::BTreeSet;

use rusqlite::Connection;

use crate::config::TicketConfig;
use crate::db::{self, query, records};
use crate::error::TicketError;
use crate::model::{Actor, NewTicket, Ticket, TicketUpdate};
use crate::policy;
use crate::users;

/// Load a ticket or fail with [`TicketError::TicketNotFound`].
///
/// # Errors
///
/// Returns not-found for unknown ids and storage errors for failed reads.
pub fn load_ticket(conn: &Connection, ticket_id: i64) -> Result<Ticket, TicketError> {
    query::get_ticket(conn, ticket_id)?.ok_or(TicketError::TicketNotFound(ticket_id))
}

/// Trim, lowercase and deduplicate tags. Blank entries are dropped.
///
/// # Errors
///
/// Returns a validation error if a tag contains inner whitespace.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Result<Vec<String>, TicketError> {
    let mut normalized = BTreeSet::new();
    for raw in tags {
        let tag = raw.as_ref().trim().to_lowercase();
        if tag.is_empty() {
            continue;
        }
        if tag.chars().any(char::is_whitespace) {
            return Err(TicketError::validation(
                "tags",
                format!("tag '{tag}' must not contain whitespace"),
            ));
        }
        normalized.insert(tag);
    }
    Ok(normalized.into_iter().collect())
}

pub(crate) fn validate_application(application: &str) -> Result<String, TicketError> {
    let application = application.trim();
    if application.is_empty() {
        return Err(TicketError::validation("application", "must not be empty"));
    }
    Ok(application.to_string())
}

pub(crate) fn validate_description(
    description: &str,
    limits: &TicketConfig,
) -> Result<String, TicketError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(TicketError::validation("description", "must not be empty"));
    }
    let chars = description.chars().count();
    if chars > limits.max_description_chars {
        return Err(TicketError::validation(
            "description",
            format!(
                "{chars} characters exceeds the limit of {}",
                limits.max_description_chars
            ),
        ));
    }
    Ok(description.to_string())
}

/// Submit a new ticket on behalf of `actor`.
///
/// # Errors
///
/// - [`TicketError::Authorization`] for anonymous actors
/// - [`TicketError::Validation`] for blank or oversized fields
/// - [`TicketError::UserNotFound`] for an unregistered submitter
pub fn create_ticket(
    conn: &mut Connection,
    actor: &Actor,
    attributes: &NewTicket,
    limits: &TicketConfig,
) -> Result<Ticket, TicketError> {
    policy::require(policy::can_submit(actor), actor, "submit tickets")?;
    let submitter = actor.username().unwrap_or_default();

    let application = validate_application(&attributes.application)?;
    let description = validate_description(&attributes.description, limits)?;
    let tags = normalize_tags(&attributes.tags)?;

    let tx = db::write_tx(conn)?;
    users::ensure_registered(&tx, actor)?;
    let ticket_id = records::insert_ticket(
        &tx,
        &records::TicketRow {
            ticket_type: attributes.ticket_type,
            priority: attributes.priority,
            application: &application,
            description: &description,
            submitted_by: submitter,
            assigned_to: None,
            parent_id: None,
            created_at_us: db::now_us(),
        },
    )?;
    records::replace_tags(&tx, ticket_id, &tags)?;
    let ticket = load_ticket(&tx, ticket_id)?;
    tx.commit()?;

    tracing::info!(ticket_id, actor = %actor, "created ticket");
    Ok(ticket)
}

/// Edit the attributes of an existing ticket.
///
/// Requires the actor to be an administrator or the submitter. Status,
/// assignee, votes and links are never touched here.
///
/// # Errors
///
/// Returns not-found, authorization, or validation errors in that order.
pub fn update_ticket(
    conn: &mut Connection,
    actor: &Actor,
    ticket_id: i64,
    update: &TicketUpdate,
    limits: &TicketConfig,
) -> Result<Ticket, TicketError> {
    let tx = db::write_tx(conn)?;
    let current = load_ticket(&tx, ticket_id)?;
    policy::require(policy::can_modify(actor, &current), actor, "edit this ticket")?;

    if update.is_empty() {
        return Ok(current);
    }

    let application = match update.application.as_deref() {
        Some(application) => validate_application(application)?,
        None => current.application.clone(),
    };
    let description = match update.description.as_deref() {
        Some(description) => validate_description(description, limits)?,
        None => current.description.clone(),
    };
    let tags = update.tags.as_deref().map(normalize_tags).transpose()?;

    records::update_attributes(
        &tx,
        ticket_id,
        update.ticket_type.unwrap_or(current.ticket_type),
        update.priority.unwrap_or(current.priority),
        &application,
        &description,
        db::now_us(),
    )?;
    if let Some(tags) = tags {
        records::replace_tags(&tx, ticket_id, &tags)?;
    }

    let ticket = load_ticket(&tx, ticket_id)?;
    tx.commit()?;

    tracing::info!(ticket_id, actor = %actor, "updated ticket");
    Ok(ticket)
}
