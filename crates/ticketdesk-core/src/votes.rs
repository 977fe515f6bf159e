//! One-vote-per-user ledger.

use rusqlite::Connection;

use crate::db::{self, records};
use crate::error::TicketError;
use crate::model::Actor;
use crate::policy;
use crate::tickets::load_ticket;
use crate::users;

/// Cast `actor`'s vote for a ticket.
///
/// Returns `true` when a new vote was recorded and `false` when the actor had
/// already voted. The ledger row and the counter bump commit together; the
/// `(ticket_id, username)` unique key settles concurrent duplicates.
///
/// # Errors
///
/// - [`TicketError::Authorization`] for anonymous actors
/// - [`TicketError::TicketNotFound`] for unknown tickets
/// - [`TicketError::UserNotFound`] for an unregistered voter
pub fn cast_vote(
    conn: &mut Connection,
    actor: &Actor,
    ticket_id: i64,
) -> Result<bool, TicketError> {
    policy::require(policy::can_vote(actor), actor, "vote")?;
    let username = actor.username().unwrap_or_default();

    let tx = db::write_tx(conn)?;
    load_ticket(&tx, ticket_id)?;
    users::ensure_registered(&tx, actor)?;
    let created = records::record_vote(&tx, ticket_id, username, db::now_us())?;
    tx.commit()?;

    if created {
        tracing::info!(ticket_id, actor = %actor, "vote recorded");
    } else {
        tracing::debug!(ticket_id, actor = %actor, "vote already recorded");
    }
    Ok(created)
}
