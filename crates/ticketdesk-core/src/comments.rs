//! Follow-up store: body validation, appends, and visibility-filtered reads.

use rusqlite::Connection;

use crate::config::CommentConfig;
use crate::db::{self, query, records};
use crate::error::TicketError;
use crate::lifecycle::{self, Transition};
use crate::model::{Actor, FollowUp, FollowUpAction, NewFollowUp, Visibility};
use crate::policy;
use crate::tickets::load_ticket;

/// Trim and check a follow-up body.
///
/// # Errors
///
/// Returns a validation error for blank bodies, bodies over the configured
/// length, or bodies containing control characters other than `\n` and `\t`.
pub fn validate_body(body: &str, limits: &CommentConfig) -> Result<String, TicketError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(TicketError::validation("comment", "must not be empty"));
    }

    let chars = body.chars().count();
    if chars > limits.max_body_chars {
        return Err(TicketError::validation(
            "comment",
            format!(
                "{chars} characters exceeds the limit of {}",
                limits.max_body_chars
            ),
        ));
    }

    if body
        .chars()
        .any(|ch| ch.is_control() && ch != '\n' && ch != '\t')
    {
        return Err(TicketError::validation(
            "comment",
            "control characters are not allowed",
        ));
    }

    Ok(body.to_string())
}

/// Append one entry to a ticket's log inside the caller's transaction.
///
/// Close and reopen entries with a blank body fail with a missing-comment
/// error before anything is written.
///
/// # Errors
///
/// Returns a validation error for a bad body, or a storage error.
pub fn append_follow_up(
    conn: &Connection,
    mut entry: NewFollowUp,
    limits: &CommentConfig,
) -> Result<FollowUp, TicketError> {
    if entry.action.requires_body() && entry.body.trim().is_empty() {
        return Err(TicketError::missing_comment(match entry.action {
            FollowUpAction::Reopened => "reopen",
            _ => "close",
        }));
    }
    entry.body = validate_body(&entry.body, limits)?;
    Ok(records::insert_follow_up(conn, &entry, db::now_us())?)
}

/// Post a comment on a ticket and return the stored entry.
///
/// Any authenticated actor may post a public comment. Internal notes are
/// limited to administrators and the submitter.
///
/// # Errors
///
/// Returns not-found, authorization, or validation errors.
pub fn add_comment(
    conn: &mut Connection,
    actor: &Actor,
    ticket_id: i64,
    body: &str,
    visibility: Visibility,
    limits: &CommentConfig,
) -> Result<FollowUp, TicketError> {
    let outcome = lifecycle::apply_transition_recorded(
        conn,
        actor,
        ticket_id,
        Transition::Comment {
            body: body.to_string(),
            visibility,
        },
        limits,
    )?;
    Ok(outcome.follow_up)
}

/// Read a ticket's log, newest first, as `requester` is allowed to see it.
///
/// # Errors
///
/// Returns [`TicketError::TicketNotFound`] for unknown tickets.
pub fn list_comments(
    conn: &Connection,
    requester: &Actor,
    ticket_id: i64,
) -> Result<Vec<FollowUp>, TicketError> {
    let ticket = load_ticket(conn, ticket_id)?;
    let visibility = policy::comment_visibility(requester, &ticket);
    tracing::debug!(ticket_id, requester = %requester, ?visibility, "listing follow-ups");
    Ok(query::get_follow_ups(conn, ticket_id, visibility)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TicketConfig;
    use crate::db::open_in_memory;
    use crate::error::{ErrorCode, ErrorKind};
    use crate::model::NewTicket;
    use crate::tickets::create_ticket;
    use crate::users::register_user;

    fn setup() -> (Connection, i64) {
        let mut conn = open_in_memory().unwrap();
        for (name, admin) in [("alice", false), ("bob", false), ("root", true)] {
            register_user(&mut conn, name, admin).unwrap();
        }
        let ticket = create_ticket(
            &mut conn,
            &Actor::user("alice"),
            &NewTicket {
                application: "portal".to_string(),
                description: "Export button does nothing".to_string(),
                ..NewTicket::default()
            },
            &TicketConfig::default(),
        )
        .unwrap();
        (conn, ticket.id)
    }

    #[test]
    fn body_rules() {
        let limits = CommentConfig { max_body_chars: 10 };
        assert_eq!(validate_body("  hi\tthere ", &limits).unwrap(), "hi\tthere");
        assert!(validate_body("   ", &limits).is_err());
        assert!(validate_body("0123456789x", &limits).is_err());
        assert!(validate_body("bell\u{7}", &limits).is_err());
        assert!(validate_body("line\nbreak", &limits).is_ok());
    }

    #[test]
    fn blank_close_entry_is_missing_comment() {
        let (conn, id) = setup();
        let err = append_follow_up(
            &conn,
            NewFollowUp {
                ticket_id: id,
                author: "root".to_string(),
                body: "  ".to_string(),
                visibility: Visibility::Internal,
                action: FollowUpAction::Closed,
            },
            &CommentConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingComment);
        assert!(query::get_follow_ups(&conn, id, query::VisibilityFilter::All)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn internal_entries_hidden_from_outsiders() {
        let (mut conn, id) = setup();
        let limits = CommentConfig::default();
        add_comment(&mut conn, &Actor::user("bob"), id, "Me too", Visibility::Public, &limits)
            .unwrap();
        add_comment(
            &mut conn,
            &Actor::admin("root"),
            id,
            "Caused by the CSV writer",
            Visibility::Internal,
            &limits,
        )
        .unwrap();

        let outsider = list_comments(&conn, &Actor::user("bob"), id).unwrap();
        assert_eq!(outsider.len(), 1);
        assert_eq!(outsider[0].body, "Me too");

        let anonymous = list_comments(&conn, &Actor::Anonymous, id).unwrap();
        assert_eq!(anonymous.len(), 1);

        let submitter = list_comments(&conn, &Actor::user("alice"), id).unwrap();
        assert_eq!(submitter.len(), 2);
        assert_eq!(submitter[0].body, "Caused by the CSV writer");

        let admin = list_comments(&conn, &Actor::admin("root"), id).unwrap();
        assert_eq!(admin, submitter);
    }

    #[test]
    fn outsiders_cannot_write_internal_notes() {
        let (mut conn, id) = setup();
        let err = add_comment(
            &mut conn,
            &Actor::user("bob"),
            id,
            "secret",
            Visibility::Internal,
            &CommentConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn anonymous_cannot_comment() {
        let (mut conn, id) = setup();
        let err = add_comment(
            &mut conn,
            &Actor::Anonymous,
            id,
            "hello",
            Visibility::Public,
            &CommentConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn unregistered_commenter_is_not_found() {
        let (mut conn, id) = setup();
        let err = add_comment(
            &mut conn,
            &Actor::user("ghost"),
            id,
            "hello",
            Visibility::Public,
            &CommentConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TicketError::UserNotFound(ref name) if name == "ghost"));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(query::get_follow_ups(&conn, id, query::VisibilityFilter::All)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn list_comments_unknown_ticket() {
        let (conn, _) = setup();
        let err = list_comments(&conn, &Actor::admin("root"), 404).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
