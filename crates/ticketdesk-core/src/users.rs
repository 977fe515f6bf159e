//! Identity provider backed by the `users` table.

use rusqlite::Connection;

use crate::db::{self, query, records};
use crate::error::TicketError;
use crate::model::{Actor, User};

const MAX_USERNAME_CHARS: usize = 150;

/// Check a username against the accepted character set.
///
/// # Errors
///
/// Returns a validation error for empty, overlong, or malformed names.
pub fn validate_username(username: &str) -> Result<(), TicketError> {
    if username.is_empty() {
        return Err(TicketError::validation("username", "must not be empty"));
    }
    if username.chars().count() > MAX_USERNAME_CHARS {
        return Err(TicketError::validation(
            "username",
            format!("must be at most {MAX_USERNAME_CHARS} characters"),
        ));
    }
    if let Some(bad) = username
        .chars()
        .find(|ch| !(ch.is_alphanumeric() || matches!(ch, '.' | '@' | '+' | '-' | '_')))
    {
        return Err(TicketError::validation(
            "username",
            format!("character '{bad}' is not allowed"),
        ));
    }
    Ok(())
}

/// Create a user or update its administrator flag.
///
/// # Errors
///
/// Returns a validation error for a malformed name, or a storage error.
pub fn register_user(
    conn: &mut Connection,
    username: &str,
    is_admin: bool,
) -> Result<User, TicketError> {
    validate_username(username)?;

    let tx = db::write_tx(conn)?;
    let created = records::upsert_user(&tx, username, is_admin, db::now_us())?;
    tx.commit()?;

    tracing::info!(username, is_admin, created, "registered user");
    Ok(User {
        username: username.to_string(),
        is_admin,
    })
}

/// Look up a user.
///
/// # Errors
///
/// Returns [`TicketError::UserNotFound`] if the name does not resolve.
pub fn get_user(conn: &Connection, username: &str) -> Result<User, TicketError> {
    query::get_user(conn, username)?.ok_or_else(|| TicketError::UserNotFound(username.to_string()))
}

/// Confirm that an authenticated actor names a registered user.
///
/// Anonymous actors pass; the policy checks refuse them separately.
///
/// # Errors
///
/// Returns [`TicketError::UserNotFound`] for an unregistered username.
pub fn ensure_registered(conn: &Connection, actor: &Actor) -> Result<(), TicketError> {
    match actor.username() {
        Some(name) => get_user(conn, name).map(|_| ()),
        None => Ok(()),
    }
}

/// All registered users.
///
/// # Errors
///
/// Returns a storage error if the read fails.
pub fn list_users(conn: &Connection) -> Result<Vec<User>, TicketError> {
    Ok(query::list_users(conn)?)
}

/// Map an optional username onto an [`Actor`].
///
/// # Errors
///
/// Returns [`TicketError::UserNotFound`] when a name is given but unknown.
pub fn resolve_actor(conn: &Connection, username: Option<&str>) -> Result<Actor, TicketError> {
    match username.map(str::trim).filter(|name| !name.is_empty()) {
        None => Ok(Actor::Anonymous),
        Some(name) => get_user(conn, name).map(Actor::User),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use crate::error::ErrorKind;

    #[test]
    fn username_rules() {
        assert!(validate_username("alice.smith+ops@example-1_x").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("semi;colon").is_err());
        assert!(validate_username(&"a".repeat(150)).is_ok());
        assert!(validate_username(&"a".repeat(151)).is_err());
    }

    #[test]
    fn register_then_promote() {
        let mut conn = open_in_memory().unwrap();
        let user = register_user(&mut conn, "alice", false).unwrap();
        assert!(!user.is_admin);
        register_user(&mut conn, "alice", true).unwrap();
        assert!(get_user(&conn, "alice").unwrap().is_admin);
        assert_eq!(list_users(&conn).unwrap().len(), 1);
    }

    #[test]
    fn resolve_actor_cases() {
        let mut conn = open_in_memory().unwrap();
        register_user(&mut conn, "root", true).unwrap();

        assert_eq!(resolve_actor(&conn, None).unwrap(), Actor::Anonymous);
        assert_eq!(resolve_actor(&conn, Some("  ")).unwrap(), Actor::Anonymous);
        assert_eq!(resolve_actor(&conn, Some("root")).unwrap(), Actor::admin("root"));

        let err = resolve_actor(&conn, Some("ghost")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn invalid_name_is_not_stored() {
        let mut conn = open_in_memory().unwrap();
        let err = register_user(&mut conn, "bad name", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(list_users(&conn).unwrap().is_empty());
    }
}
