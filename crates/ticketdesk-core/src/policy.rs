//! Authorization predicates.
//!
//! Everything here is a pure function of the actor and, where relevant, the
//! ticket. Callers pair a predicate with [`require`] to turn a refusal into
//! [`TicketError::Authorization`].

use crate::db::query::VisibilityFilter;
use crate::error::TicketError;
use crate::model::{Actor, Ticket};

/// Administrators and the ticket's submitter may edit it.
#[must_use]
pub fn can_modify(actor: &Actor, ticket: &Ticket) -> bool {
    actor.is_admin() || actor.username() == Some(ticket.submitted_by.as_str())
}

/// Workflow transitions (accept, assign, close, reopen, split).
#[must_use]
pub const fn can_administer(actor: &Actor) -> bool {
    actor.is_admin()
}

/// Any authenticated actor may comment.
#[must_use]
pub const fn can_comment(actor: &Actor) -> bool {
    actor.is_authenticated()
}

/// Any authenticated actor may vote.
#[must_use]
pub const fn can_vote(actor: &Actor) -> bool {
    actor.is_authenticated()
}

/// Any authenticated actor may submit tickets.
#[must_use]
pub const fn can_submit(actor: &Actor) -> bool {
    actor.is_authenticated()
}

/// Which follow-ups `requester` may read on `ticket`.
///
/// Administrators and the submitter see internal entries too.
#[must_use]
pub fn comment_visibility(requester: &Actor, ticket: &Ticket) -> VisibilityFilter {
    if can_modify(requester, ticket) {
        VisibilityFilter::All
    } else {
        VisibilityFilter::PublicOnly
    }
}

/// Turn a predicate outcome into an authorization error.
///
/// # Errors
///
/// Returns [`TicketError::Authorization`] when `allowed` is false.
pub fn require(allowed: bool, actor: &Actor, action: &'static str) -> Result<(), TicketError> {
    if allowed {
        Ok(())
    } else {
        tracing::warn!(actor = %actor, action, "authorization refused");
        Err(TicketError::Authorization {
            actor: actor.to_string(),
            action,
        })
    }
}
