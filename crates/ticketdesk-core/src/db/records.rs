//! Row-level writes against the ticket store.
//!
//! These helpers do no validation and take no locks of their own. Callers
//! run them inside a [`super::write_tx`] transaction after authorization
//! and lifecycle checks have passed.

use rusqlite::{Connection, params};

use crate::model::{FollowUp, NewFollowUp, Priority, Status, TicketType};

/// Column values for a freshly inserted ticket.
#[derive(Debug, Clone)]
pub struct TicketRow<'a> {
    pub ticket_type: TicketType,
    pub priority: Priority,
    pub application: &'a str,
    pub description: &'a str,
    pub submitted_by: &'a str,
    pub assigned_to: Option<&'a str>,
    pub parent_id: Option<i64>,
    pub created_at_us: i64,
}

/// Insert or update a user, returning whether a new row was created.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_user(
    conn: &Connection,
    username: &str,
    is_admin: bool,
    now_us: i64,
) -> rusqlite::Result<bool> {
    let existed: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
        params![username],
        |row| row.get(0),
    )?;
    conn.execute(
        "INSERT INTO users (username, is_admin, created_at_us) VALUES (?1, ?2, ?3)
         ON CONFLICT(username) DO UPDATE SET is_admin = excluded.is_admin",
        params![username, i64::from(is_admin), now_us],
    )?;
    Ok(!existed)
}

/// Insert a ticket with status `new` and return its id.
///
/// # Errors
///
/// Returns an error if the insert violates a constraint or fails.
pub fn insert_ticket(conn: &Connection, row: &TicketRow<'_>) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO tickets (
            status, ticket_type, priority, application, description,
            submitted_by, assigned_to, parent_id, created_at_us, updated_at_us
         ) VALUES ('new', ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
        params![
            row.ticket_type.as_str(),
            row.priority.as_str(),
            row.application,
            row.description,
            row.submitted_by,
            row.assigned_to,
            row.parent_id,
            row.created_at_us,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Replace a ticket's tag set.
///
/// # Errors
///
/// Returns an error if any write fails.
pub fn replace_tags(conn: &Connection, ticket_id: i64, tags: &[String]) -> rusqlite::Result<()> {
    conn.execute(
        "DELETE FROM ticket_tags WHERE ticket_id = ?1",
        params![ticket_id],
    )?;
    let mut stmt =
        conn.prepare_cached("INSERT OR IGNORE INTO ticket_tags (ticket_id, tag) VALUES (?1, ?2)")?;
    for tag in tags {
        stmt.execute(params![ticket_id, tag])?;
    }
    Ok(())
}

/// Overwrite the editable attributes of a ticket.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_attributes(
    conn: &Connection,
    ticket_id: i64,
    ticket_type: TicketType,
    priority: Priority,
    application: &str,
    description: &str,
    now_us: i64,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE tickets
         SET ticket_type = ?2, priority = ?3, application = ?4, description = ?5,
             updated_at_us = ?6
         WHERE ticket_id = ?1",
        params![
            ticket_id,
            ticket_type.as_str(),
            priority.as_str(),
            application,
            description,
            now_us
        ],
    )
}

/// Set a ticket's status and duplicate reference.
///
/// `duplicate_of` is cleared unless the new status is `duplicate`.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_status(
    conn: &Connection,
    ticket_id: i64,
    status: Status,
    duplicate_of: Option<i64>,
    now_us: i64,
) -> rusqlite::Result<usize> {
    let duplicate_of = if status == Status::Duplicate {
        duplicate_of
    } else {
        None
    };
    conn.execute(
        "UPDATE tickets SET status = ?2, duplicate_of = ?3, updated_at_us = ?4
         WHERE ticket_id = ?1",
        params![ticket_id, status.as_str(), duplicate_of, now_us],
    )
}

/// Set status `assigned` and the assignee in one statement.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_assignee(
    conn: &Connection,
    ticket_id: i64,
    assignee: &str,
    now_us: i64,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE tickets SET status = 'assigned', assigned_to = ?2, updated_at_us = ?3
         WHERE ticket_id = ?1",
        params![ticket_id, assignee, now_us],
    )
}

/// Append a follow-up and return the stored entry.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_follow_up(
    conn: &Connection,
    entry: &NewFollowUp,
    now_us: i64,
) -> rusqlite::Result<FollowUp> {
    conn.execute(
        "INSERT INTO follow_ups (ticket_id, author, body, visibility, action, created_at_us)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            entry.ticket_id,
            entry.author,
            entry.body,
            entry.visibility.as_str(),
            entry.action.as_str(),
            now_us
        ],
    )?;
    Ok(FollowUp {
        id: conn.last_insert_rowid(),
        ticket_id: entry.ticket_id,
        author: entry.author.clone(),
        body: entry.body.clone(),
        visibility: entry.visibility,
        action: entry.action,
        created_at_us: now_us,
    })
}

/// Record a vote, returning `true` only when a new ledger row was written.
///
/// The counter is bumped in the same statement batch as the insert, so the
/// two never diverge within the enclosing transaction.
///
/// # Errors
///
/// Returns an error if either write fails.
pub fn record_vote(
    conn: &Connection,
    ticket_id: i64,
    username: &str,
    now_us: i64,
) -> rusqlite::Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO user_vote_log (ticket_id, username, created_at_us)
         VALUES (?1, ?2, ?3)",
        params![ticket_id, username, now_us],
    )?;
    if inserted == 0 {
        return Ok(false);
    }
    conn.execute(
        "UPDATE tickets SET vote_count = vote_count + 1 WHERE ticket_id = ?1",
        params![ticket_id],
    )?;
    Ok(true)
}
