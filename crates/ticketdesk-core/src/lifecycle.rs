//! Ticket state machine.
//!
//! Every inbound workflow action is a [`Transition`] variant. [`apply_transition`]
//! opens one `BEGIN IMMEDIATE` transaction and, inside it:
//!
//! 1. loads the ticket (not-found),
//! 2. checks the actor against the policy (authorization),
//! 3. validates the variant's required fields (validation),
//! 4. checks the current status permits the action (invalid state),
//! 5. appends the follow-up, then writes the new status.
//!
//! Any error drops the transaction, so nothing is written. Because the write
//! lock is taken before step 1, a racing transition on the same ticket
//! validates against whatever the previous one committed.

use rusqlite::{Connection, Transaction};

use crate::comments::{append_follow_up, validate_body};
use crate::config::CommentConfig;
use crate::db::{self, query, records};
use crate::error::TicketError;
use crate::model::{
    Actor, FollowUp, FollowUpAction, NewFollowUp, Status, Ticket, TicketAction, Visibility,
};
use crate::policy;
use crate::tickets::load_ticket;
use crate::users;

/// A workflow action together with the fields it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Accept {
        comment: Option<String>,
    },
    Assign {
        to: String,
        comment: Option<String>,
    },
    Close {
        comment: String,
        duplicate_of: Option<i64>,
    },
    Reopen {
        comment: String,
    },
    Comment {
        body: String,
        visibility: Visibility,
    },
}

impl Transition {
    #[must_use]
    pub const fn action(&self) -> TicketAction {
        match self {
            Self::Accept { .. } => TicketAction::Accept,
            Self::Assign { .. } => TicketAction::Assign,
            Self::Close { .. } => TicketAction::Close,
            Self::Reopen { .. } => TicketAction::Reopen,
            Self::Comment { .. } => TicketAction::Comment,
        }
    }
}

/// The ticket after a transition and the follow-up it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub ticket: Ticket,
    pub follow_up: FollowUp,
}

/// Apply `transition` to a ticket and return the updated ticket.
///
/// # Errors
///
/// Returns one of the taxonomy errors; see the module docs for the order in
/// which they are checked. Nothing is written when an error is returned.
pub fn apply_transition(
    conn: &mut Connection,
    actor: &Actor,
    ticket_id: i64,
    transition: Transition,
    limits: &CommentConfig,
) -> Result<Ticket, TicketError> {
    apply_transition_recorded(conn, actor, ticket_id, transition, limits)
        .map(|outcome| outcome.ticket)
}

/// Like [`apply_transition`], also returning the appended follow-up.
///
/// # Errors
///
/// Same as [`apply_transition`].
pub fn apply_transition_recorded(
    conn: &mut Connection,
    actor: &Actor,
    ticket_id: i64,
    transition: Transition,
    limits: &CommentConfig,
) -> Result<TransitionOutcome, TicketError> {
    let action = transition.action();
    let tx = db::write_tx(conn)?;
    let ticket = load_ticket(&tx, ticket_id)?;
    users::ensure_registered(&tx, actor)?;

    let follow_up = match transition {
        Transition::Accept { comment } => accept(&tx, actor, &ticket, comment, limits)?,
        Transition::Assign { to, comment } => assign(&tx, actor, &ticket, &to, comment, limits)?,
        Transition::Close {
            comment,
            duplicate_of,
        } => close(&tx, actor, &ticket, &comment, duplicate_of, limits)?,
        Transition::Reopen { comment } => reopen(&tx, actor, &ticket, &comment, limits)?,
        Transition::Comment { body, visibility } => {
            post_comment(&tx, actor, &ticket, &body, visibility, limits)?
        }
    };

    let ticket = load_ticket(&tx, ticket_id)?;
    tx.commit()?;

    tracing::info!(
        ticket_id,
        actor = %actor,
        action = action.as_str(),
        status = ticket.status.as_str(),
        "applied transition"
    );
    Ok(TransitionOutcome { ticket, follow_up })
}

/// Map a lifecycle refusal onto [`TicketError::InvalidState`].
pub(crate) fn check_state(ticket: &Ticket, action: TicketAction) -> Result<(), TicketError> {
    ticket.status.permits(action).map_err(|refusal| {
        tracing::warn!(
            ticket_id = ticket.id,
            action = action.as_str(),
            status = refusal.from.as_str(),
            reason = refusal.reason,
            "transition refused"
        );
        TicketError::InvalidState {
            ticket_id: ticket.id,
            action: action.as_str(),
            status: refusal.from.to_string(),
        }
    })
}

fn require_admin(actor: &Actor, action: TicketAction) -> Result<(), TicketError> {
    policy::require(policy::can_administer(actor), actor, action.as_str())
}

fn author(actor: &Actor) -> String {
    actor.username().unwrap_or("anonymous").to_string()
}

fn optional_body(
    comment: Option<String>,
    limits: &CommentConfig,
) -> Result<Option<String>, TicketError> {
    comment
        .filter(|body| !body.trim().is_empty())
        .map(|body| validate_body(&body, limits))
        .transpose()
}

fn accept(
    tx: &Transaction<'_>,
    actor: &Actor,
    ticket: &Ticket,
    comment: Option<String>,
    limits: &CommentConfig,
) -> Result<FollowUp, TicketError> {
    require_admin(actor, TicketAction::Accept)?;
    let body = optional_body(comment, limits)?.unwrap_or_else(|| "Ticket accepted.".to_string());
    check_state(ticket, TicketAction::Accept)?;

    let entry = append_follow_up(
        tx,
        NewFollowUp {
            ticket_id: ticket.id,
            author: author(actor),
            body,
            visibility: Visibility::Public,
            action: FollowUpAction::Accepted,
        },
        limits,
    )?;
    records::set_status(tx, ticket.id, Status::Accepted, None, entry.created_at_us)?;
    Ok(entry)
}

fn assign(
    tx: &Transaction<'_>,
    actor: &Actor,
    ticket: &Ticket,
    to: &str,
    comment: Option<String>,
    limits: &CommentConfig,
) -> Result<FollowUp, TicketError> {
    require_admin(actor, TicketAction::Assign)?;
    let assignee = query::get_user(tx, to.trim())?
        .ok_or_else(|| TicketError::UserNotFound(to.trim().to_string()))?;
    let body = match optional_body(comment, limits)? {
        Some(body) => body,
        None if ticket.assigned_to.is_some() => {
            format!("Ticket re-assigned to {}.", assignee.username)
        }
        None => format!("Ticket assigned to {}.", assignee.username),
    };
    check_state(ticket, TicketAction::Assign)?;

    let entry = append_follow_up(
        tx,
        NewFollowUp {
            ticket_id: ticket.id,
            author: author(actor),
            body,
            visibility: Visibility::Public,
            action: FollowUpAction::Assigned,
        },
        limits,
    )?;
    records::set_assignee(tx, ticket.id, &assignee.username, entry.created_at_us)?;
    Ok(entry)
}

fn close(
    tx: &Transaction<'_>,
    actor: &Actor,
    ticket: &Ticket,
    comment: &str,
    duplicate_of: Option<i64>,
    limits: &CommentConfig,
) -> Result<FollowUp, TicketError> {
    require_admin(actor, TicketAction::Close)?;
    if comment.trim().is_empty() {
        return Err(TicketError::missing_comment("close"));
    }
    let body = validate_body(comment, limits)?;
    if let Some(original) = duplicate_of {
        if original == ticket.id {
            return Err(TicketError::validation(
                "duplicate_of",
                "a ticket cannot duplicate itself",
            ));
        }
        if !query::ticket_exists(tx, original)? {
            return Err(TicketError::TicketNotFound(original));
        }
    }
    check_state(ticket, TicketAction::Close)?;

    let visibility = if actor.username() == Some(ticket.submitted_by.as_str()) {
        Visibility::Public
    } else {
        Visibility::Internal
    };
    let entry = append_follow_up(
        tx,
        NewFollowUp {
            ticket_id: ticket.id,
            author: author(actor),
            body,
            visibility,
            action: FollowUpAction::Closed,
        },
        limits,
    )?;

    let status = if duplicate_of.is_some() {
        Status::Duplicate
    } else {
        Status::Closed
    };
    records::set_status(tx, ticket.id, status, duplicate_of, entry.created_at_us)?;
    Ok(entry)
}

fn reopen(
    tx: &Transaction<'_>,
    actor: &Actor,
    ticket: &Ticket,
    comment: &str,
    limits: &CommentConfig,
) -> Result<FollowUp, TicketError> {
    require_admin(actor, TicketAction::Reopen)?;
    if comment.trim().is_empty() {
        return Err(TicketError::missing_comment("reopen"));
    }
    let body = validate_body(comment, limits)?;
    check_state(ticket, TicketAction::Reopen)?;

    let entry = append_follow_up(
        tx,
        NewFollowUp {
            ticket_id: ticket.id,
            author: author(actor),
            body,
            visibility: Visibility::Public,
            action: FollowUpAction::Reopened,
        },
        limits,
    )?;
    records::set_status(tx, ticket.id, Status::Reopened, None, entry.created_at_us)?;
    Ok(entry)
}

fn post_comment(
    tx: &Transaction<'_>,
    actor: &Actor,
    ticket: &Ticket,
    body: &str,
    visibility: Visibility,
    limits: &CommentConfig,
) -> Result<FollowUp, TicketError> {
    policy::require(policy::can_comment(actor), actor, "comment")?;
    if visibility == Visibility::Internal {
        policy::require(
            policy::can_modify(actor, ticket),
            actor,
            "write internal notes on this ticket",
        )?;
    }
    let body = validate_body(body, limits)?;
    check_state(ticket, TicketAction::Comment)?;

    append_follow_up(
        tx,
        NewFollowUp {
            ticket_id: ticket.id,
            author: author(actor),
            body,
            visibility,
            action: FollowUpAction::Comment,
        },
        limits,
    )
}
