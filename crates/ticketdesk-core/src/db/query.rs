//! `SQLite` read helpers for the ticket store.
//!
//! Typed structs and composable query functions for the access patterns the
//! lifecycle engine and the listing layer need: fetch a ticket, list/filter
//! tickets, read a follow-up log under a visibility predicate, resolve users,
//! and aggregate distinct column values for filter controls.
//!
//! Functions take a shared `&Connection` (a `Transaction` derefs to one) and
//! return `rusqlite::Result<T>` so callers can fold storage failures into
//! their own error type.

use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter, types::Type};
use std::fmt::Write as _;
use std::str::FromStr;

use crate::model::{
    FollowUp, ParseEnumError, Priority, Status, Ticket, TicketType, User, Visibility,
};

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Which slice of the lifecycle a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    All,
    /// `new`, `accepted`, `assigned`, `reopened`.
    Open,
    /// `closed`, `duplicate`, `split`.
    Closed,
}

impl Scope {
    fn statuses(self) -> Option<&'static [Status]> {
        match self {
            Self::All => None,
            Self::Open => Some(&Status::OPEN),
            Self::Closed => Some(&Status::INACTIVE),
        }
    }
}

/// How a user filter relates to a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserRole {
    SubmittedBy,
    AssignedTo,
    /// Submitted by or assigned to the user.
    #[default]
    Either,
}

/// Filter criteria for ticket listings.
///
/// All fields are optional. When multiple fields are set, they are combined
/// with AND semantics.
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    pub scope: Scope,
    pub status: Option<Status>,
    pub ticket_type: Option<TicketType>,
    pub priority: Option<Priority>,
    pub application: Option<String>,
    /// Ticket must carry this tag.
    pub tag: Option<String>,
    /// Case-insensitive substring of the description.
    pub query: Option<String>,
    pub user: Option<String>,
    pub role: UserRole,
    pub parent_id: Option<i64>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Which follow-ups a reader may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityFilter {
    /// Public and internal entries.
    All,
    PublicOnly,
}

impl VisibilityFilter {
    const fn sql_predicate(self) -> &'static str {
        match self {
            Self::All => "",
            Self::PublicOnly => " AND visibility = 'public'",
        }
    }

    /// Whether an entry with `visibility` passes this filter.
    #[must_use]
    pub const fn admits(self, visibility: Visibility) -> bool {
        match self {
            Self::All => true,
            Self::PublicOnly => matches!(visibility, Visibility::Public),
        }
    }
}

/// Ticket columns whose distinct values feed filter controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistinctColumn {
    Application,
    SubmittedBy,
    AssignedTo,
}

impl DistinctColumn {
    const fn column(self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::SubmittedBy => "submitted_by",
            Self::AssignedTo => "assigned_to",
        }
    }
}

/// Tag usage row.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Tickets
// ---------------------------------------------------------------------------

const TICKET_COLUMNS: &str = "t.ticket_id, t.status, t.ticket_type, t.priority, \
     t.application, t.description, t.submitted_by, t.assigned_to, t.vote_count, \
     t.parent_id, t.duplicate_of, t.created_at_us, t.updated_at_us, \
     (SELECT group_concat(tag, ' ') FROM ticket_tags tt WHERE tt.ticket_id = t.ticket_id)";

/// Fetch a single ticket by id, tags included.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_ticket(conn: &Connection, ticket_id: i64) -> rusqlite::Result<Option<Ticket>> {
    let sql = format!("SELECT {TICKET_COLUMNS} FROM tickets t WHERE t.ticket_id = ?1");
    conn.query_row(&sql, params![ticket_id], row_to_ticket)
        .optional()
}

/// Check whether a ticket id resolves.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn ticket_exists(conn: &Connection, ticket_id: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM tickets WHERE ticket_id = ?1)",
        params![ticket_id],
        |row| row.get(0),
    )
}

/// List tickets matching `filter`, newest first.
///
/// Ties on `created_at_us` are broken by the higher id first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_tickets(conn: &Connection, filter: &TicketFilter) -> rusqlite::Result<Vec<Ticket>> {
    let (where_clause, values) = build_where(filter);

    let limit_clause = match (filter.limit, filter.offset) {
        (Some(limit), Some(offset)) => format!(" LIMIT {limit} OFFSET {offset}"),
        (Some(limit), None) => format!(" LIMIT {limit}"),
        (None, Some(offset)) => format!(" LIMIT -1 OFFSET {offset}"),
        (None, None) => String::new(),
    };

    let sql = format!(
        "SELECT {TICKET_COLUMNS} FROM tickets t{where_clause} \
         ORDER BY t.created_at_us DESC, t.ticket_id DESC{limit_clause}"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), row_to_ticket)?;
    rows.collect()
}

/// Count tickets matching `filter`, ignoring `limit`/`offset`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_tickets(conn: &Connection, filter: &TicketFilter) -> rusqlite::Result<u64> {
    let (where_clause, values) = build_where(filter);
    let sql = format!("SELECT COUNT(*) FROM tickets t{where_clause}");
    let count: i64 = conn.query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))?;
    Ok(u64::try_from(count).unwrap_or(0))
}

/// Children created by splitting `parent_id`, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_children(conn: &Connection, parent_id: i64) -> rusqlite::Result<Vec<Ticket>> {
    let sql = format!(
        "SELECT {TICKET_COLUMNS} FROM tickets t WHERE t.parent_id = ?1 ORDER BY t.ticket_id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![parent_id], row_to_ticket)?;
    rows.collect()
}

fn build_where(filter: &TicketFilter) -> (String, Vec<rusqlite::types::Value>) {
    use rusqlite::types::Value;

    let mut conditions: Vec<String> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(statuses) = filter.scope.statuses() {
        let list = statuses
            .iter()
            .map(|status| format!("'{}'", status.as_str()))
            .collect::<Vec<_>>()
            .join(", ");
        conditions.push(format!("t.status IN ({list})"));
    }

    if let Some(status) = filter.status {
        values.push(Value::Text(status.as_str().to_string()));
        conditions.push(format!("t.status = ?{}", values.len()));
    }

    if let Some(ticket_type) = filter.ticket_type {
        values.push(Value::Text(ticket_type.as_str().to_string()));
        conditions.push(format!("t.ticket_type = ?{}", values.len()));
    }

    if let Some(priority) = filter.priority {
        values.push(Value::Text(priority.as_str().to_string()));
        conditions.push(format!("t.priority = ?{}", values.len()));
    }

    if let Some(ref application) = filter.application {
        values.push(Value::Text(application.clone()));
        conditions.push(format!("t.application = ?{}", values.len()));
    }

    if let Some(parent_id) = filter.parent_id {
        values.push(Value::Integer(parent_id));
        conditions.push(format!("t.parent_id = ?{}", values.len()));
    }

    if let Some(ref tag) = filter.tag {
        values.push(Value::Text(tag.clone()));
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM ticket_tags tt \
             WHERE tt.ticket_id = t.ticket_id AND tt.tag = ?{})",
            values.len()
        ));
    }

    if let Some(ref query) = filter.query {
        values.push(Value::Text(query.to_lowercase()));
        conditions.push(format!("instr(lower(t.description), ?{}) > 0", values.len()));
    }

    if let Some(ref user) = filter.user {
        values.push(Value::Text(user.clone()));
        let idx = values.len();
        let mut clause = String::new();
        match filter.role {
            UserRole::SubmittedBy => {
                let _ = write!(clause, "t.submitted_by = ?{idx}");
            }
            UserRole::AssignedTo => {
                let _ = write!(clause, "t.assigned_to = ?{idx}");
            }
            UserRole::Either => {
                let _ = write!(clause, "(t.submitted_by = ?{idx} OR t.assigned_to = ?{idx})");
            }
        }
        conditions.push(clause);
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    (where_clause, values)
}

// ---------------------------------------------------------------------------
// Follow-ups
// ---------------------------------------------------------------------------

/// Read a ticket's follow-up log, newest first, under `visibility`.
///
/// Entries sharing a timestamp are ordered by the higher id first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_follow_ups(
    conn: &Connection,
    ticket_id: i64,
    visibility: VisibilityFilter,
) -> rusqlite::Result<Vec<FollowUp>> {
    let sql = format!(
        "SELECT follow_up_id, ticket_id, author, body, visibility, action, created_at_us \
         FROM follow_ups WHERE ticket_id = ?1{} \
         ORDER BY created_at_us DESC, follow_up_id DESC",
        visibility.sql_predicate()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![ticket_id], row_to_follow_up)?;
    rows.collect()
}

/// Count follow-ups on a ticket regardless of visibility.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_follow_ups(conn: &Connection, ticket_id: i64) -> rusqlite::Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM follow_ups WHERE ticket_id = ?1",
        params![ticket_id],
        |row| row.get(0),
    )?;
    Ok(u64::try_from(count).unwrap_or(0))
}

// ---------------------------------------------------------------------------
// Users, votes, tags, aggregates
// ---------------------------------------------------------------------------

/// Resolve a username.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_user(conn: &Connection, username: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT username, is_admin FROM users WHERE username = ?1",
        params![username],
        row_to_user,
    )
    .optional()
}

/// All registered users, alphabetical.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_users(conn: &Connection) -> rusqlite::Result<Vec<User>> {
    let mut stmt = conn.prepare("SELECT username, is_admin FROM users ORDER BY username")?;
    let rows = stmt.query_map([], row_to_user)?;
    rows.collect()
}

/// Whether `username` already has a ledger entry for `ticket_id`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn has_voted(conn: &Connection, ticket_id: i64, username: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM user_vote_log WHERE ticket_id = ?1 AND username = ?2)",
        params![ticket_id, username],
        |row| row.get(0),
    )
}

/// Number of distinct voters recorded for a ticket.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_voters(conn: &Connection, ticket_id: i64) -> rusqlite::Result<u32> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM user_vote_log WHERE ticket_id = ?1",
        params![ticket_id],
        |row| row.get(0),
    )?;
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

/// Tag usage counts across all tickets, most used first.
///
/// # Errors
///
/// Returns an error if the aggregate query fails.
pub fn list_tags(conn: &Connection) -> rusqlite::Result<Vec<TagCount>> {
    let mut stmt = conn.prepare(
        "SELECT tag, COUNT(*) AS count FROM ticket_tags \
         GROUP BY tag ORDER BY count DESC, tag ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        let count: i64 = row.get(1)?;
        Ok(TagCount {
            tag: row.get(0)?,
            count: usize::try_from(count).unwrap_or(usize::MAX),
        })
    })?;
    rows.collect()
}

/// Distinct non-null values of a ticket column, sorted ascending.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn distinct_values(conn: &Connection, column: DistinctColumn) -> rusqlite::Result<Vec<String>> {
    let column = column.column();
    let sql = format!(
        "SELECT DISTINCT {column} FROM tickets WHERE {column} IS NOT NULL ORDER BY {column}"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect()
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = ParseEnumError>,
{
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(error))
    })
}

fn row_to_ticket(row: &Row<'_>) -> rusqlite::Result<Ticket> {
    let vote_count: i64 = row.get(8)?;
    let tags: Option<String> = row.get(13)?;
    let mut tags: Vec<String> = tags
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    tags.sort();

    Ok(Ticket {
        id: row.get(0)?,
        status: parse_column(row, 1)?,
        ticket_type: parse_column(row, 2)?,
        priority: parse_column(row, 3)?,
        application: row.get(4)?,
        description: row.get(5)?,
        submitted_by: row.get(6)?,
        assigned_to: row.get(7)?,
        vote_count: u32::try_from(vote_count).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(8, Type::Integer, Box::new(error))
        })?,
        parent_id: row.get(9)?,
        duplicate_of: row.get(10)?,
        tags,
        created_at_us: row.get(11)?,
        updated_at_us: row.get(12)?,
    })
}

pub(crate) fn row_to_follow_up(row: &Row<'_>) -> rusqlite::Result<FollowUp> {
    Ok(FollowUp {
        id: row.get(0)?,
        ticket_id: row.get(1)?,
        author: row.get(2)?,
        body: row.get(3)?,
        visibility: parse_column(row, 4)?,
        action: parse_column(row, 5)?,
        created_at_us: row.get(6)?,
    })
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        username: row.get(0)?,
        is_admin: row.get::<_, i64>(1)? != 0,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use rusqlite::{Connection, params};

    fn test_db() -> Connection {
        let conn = open_in_memory().expect("open in-memory store");
        for (name, admin) in [("alice", 0), ("bob", 0), ("root", 1)] {
            conn.execute(
                "INSERT INTO users (username, is_admin, created_at_us) VALUES (?1, ?2, 1)",
                params![name, admin],
            )
            .expect("insert user");
        }
        conn
    }

    #[allow(clippy::too_many_arguments)]
    fn insert_ticket(
        conn: &Connection,
        status: &str,
        ticket_type: &str,
        application: &str,
        description: &str,
        submitted_by: &str,
        assigned_to: Option<&str>,
        created: i64,
    ) -> i64 {
        conn.execute(
            "INSERT INTO tickets (status, ticket_type, priority, application, description, \
             submitted_by, assigned_to, created_at_us, updated_at_us) \
             VALUES (?1, ?2, 'normal', ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                status,
                ticket_type,
                application,
                description,
                submitted_by,
                assigned_to,
                created
            ],
        )
        .expect("insert ticket");
        conn.last_insert_rowid()
    }

    fn insert_tag(conn: &Connection, ticket_id: i64, tag: &str) {
        conn.execute(
            "INSERT INTO ticket_tags (ticket_id, tag) VALUES (?1, ?2)",
            params![ticket_id, tag],
        )
        .expect("insert tag");
    }

    fn insert_follow_up(conn: &Connection, ticket_id: i64, body: &str, visibility: &str, ts: i64) {
        conn.execute(
            "INSERT INTO follow_ups (ticket_id, author, body, visibility, action, created_at_us) \
             VALUES (?1, 'root', ?2, ?3, 'comment', ?4)",
            params![ticket_id, body, visibility, ts],
        )
        .expect("insert follow-up");
    }

    fn ids(tickets: &[Ticket]) -> Vec<i64> {
        tickets.iter().map(|ticket| ticket.id).collect()
    }

    #[test]
    fn get_ticket_found_with_sorted_tags() {
        let conn = test_db();
        let id = insert_ticket(&conn, "new", "bug", "portal", "Login fails", "alice", None, 10);
        insert_tag(&conn, id, "ui");
        insert_tag(&conn, id, "auth");

        let ticket = get_ticket(&conn, id).unwrap().unwrap();
        assert_eq!(ticket.status, Status::New);
        assert_eq!(ticket.ticket_type, TicketType::Bug);
        assert_eq!(ticket.priority, Priority::Normal);
        assert_eq!(ticket.submitted_by, "alice");
        assert_eq!(ticket.tags, vec!["auth".to_string(), "ui".to_string()]);
        assert_eq!(ticket.vote_count, 0);
    }

    #[test]
    fn get_ticket_not_found() {
        let conn = test_db();
        assert!(get_ticket(&conn, 404).unwrap().is_none());
        assert!(!ticket_exists(&conn, 404).unwrap());
    }

    #[test]
    fn list_tickets_newest_first_with_id_tiebreak() {
        let conn = test_db();
        let a = insert_ticket(&conn, "new", "bug", "portal", "A", "alice", None, 100);
        let b = insert_ticket(&conn, "new", "bug", "portal", "B", "alice", None, 100);
        let c = insert_ticket(&conn, "new", "bug", "portal", "C", "alice", None, 300);

        let all = list_tickets(&conn, &TicketFilter::default()).unwrap();
        assert_eq!(ids(&all), vec![c, b, a]);
    }

    #[test]
    fn list_tickets_by_scope() {
        let conn = test_db();
        let open = insert_ticket(&conn, "reopened", "bug", "portal", "A", "alice", None, 1);
        let closed = insert_ticket(&conn, "closed", "bug", "portal", "B", "alice", None, 2);
        let split = insert_ticket(&conn, "split", "bug", "portal", "C", "alice", None, 3);

        let open_list = list_tickets(
            &conn,
            &TicketFilter {
                scope: Scope::Open,
                ..TicketFilter::default()
            },
        )
        .unwrap();
        assert_eq!(ids(&open_list), vec![open]);

        let closed_list = list_tickets(
            &conn,
            &TicketFilter {
                scope: Scope::Closed,
                ..TicketFilter::default()
            },
        )
        .unwrap();
        assert_eq!(ids(&closed_list), vec![split, closed]);
    }

    #[test]
    fn list_tickets_by_user_role() {
        let conn = test_db();
        let mine = insert_ticket(&conn, "new", "bug", "portal", "A", "alice", None, 1);
        let assigned =
            insert_ticket(&conn, "assigned", "bug", "portal", "B", "bob", Some("alice"), 2);
        let _other = insert_ticket(&conn, "new", "bug", "portal", "C", "bob", None, 3);

        let filter = |role| TicketFilter {
            user: Some("alice".to_string()),
            role,
            ..TicketFilter::default()
        };

        assert_eq!(
            ids(&list_tickets(&conn, &filter(UserRole::SubmittedBy)).unwrap()),
            vec![mine]
        );
        assert_eq!(
            ids(&list_tickets(&conn, &filter(UserRole::AssignedTo)).unwrap()),
            vec![assigned]
        );
        assert_eq!(
            ids(&list_tickets(&conn, &filter(UserRole::Either)).unwrap()),
            vec![assigned, mine]
        );
    }

    #[test]
    fn list_tickets_combined_filters() {
        let conn = test_db();
        let hit =
            insert_ticket(&conn, "new", "feature", "portal", "Export to CSV", "alice", None, 1);
        insert_tag(&conn, hit, "export");
        let miss_type =
            insert_ticket(&conn, "new", "bug", "portal", "Export broken", "alice", None, 2);
        insert_tag(&conn, miss_type, "export");
        let _miss_tag =
            insert_ticket(&conn, "new", "feature", "portal", "Export to PDF", "alice", None, 3);

        let found = list_tickets(
            &conn,
            &TicketFilter {
                ticket_type: Some(TicketType::Feature),
                tag: Some("export".to_string()),
                query: Some("csv".to_string()),
                ..TicketFilter::default()
            },
        )
        .unwrap();
        assert_eq!(ids(&found), vec![hit]);
    }

    #[test]
    fn list_tickets_with_limit_and_offset() {
        let conn = test_db();
        for idx in 0..5 {
            insert_ticket(&conn, "new", "bug", "portal", "T", "alice", None, idx);
        }
        let filter = TicketFilter {
            limit: Some(2),
            offset: Some(1),
            ..TicketFilter::default()
        };
        let page = list_tickets(&conn, &filter).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].created_at_us, 3);
        assert_eq!(count_tickets(&conn, &filter).unwrap(), 5);
    }

    #[test]
    fn follow_ups_respect_visibility_and_order() {
        let conn = test_db();
        let id = insert_ticket(&conn, "new", "bug", "portal", "A", "alice", None, 1);
        insert_follow_up(&conn, id, "first", "public", 100);
        insert_follow_up(&conn, id, "hidden", "internal", 200);
        insert_follow_up(&conn, id, "tied", "public", 200);

        let all = get_follow_ups(&conn, id, VisibilityFilter::All).unwrap();
        let bodies: Vec<&str> = all.iter().map(|f| f.body.as_str()).collect();
        assert_eq!(bodies, vec!["tied", "hidden", "first"]);

        let public = get_follow_ups(&conn, id, VisibilityFilter::PublicOnly).unwrap();
        assert!(public.iter().all(|f| f.visibility == Visibility::Public));
        assert_eq!(public.len(), 2);
        assert_eq!(count_follow_ups(&conn, id).unwrap(), 3);
    }

    #[test]
    fn visibility_filter_admits() {
        assert!(VisibilityFilter::All.admits(Visibility::Internal));
        assert!(!VisibilityFilter::PublicOnly.admits(Visibility::Internal));
        assert!(VisibilityFilter::PublicOnly.admits(Visibility::Public));
    }

    #[test]
    fn users_resolve_with_admin_flag() {
        let conn = test_db();
        assert!(get_user(&conn, "root").unwrap().unwrap().is_admin);
        assert!(!get_user(&conn, "alice").unwrap().unwrap().is_admin);
        assert!(get_user(&conn, "ghost").unwrap().is_none());
        let names: Vec<String> = list_users(&conn)
            .unwrap()
            .into_iter()
            .map(|user| user.username)
            .collect();
        assert_eq!(names, vec!["alice", "bob", "root"]);
    }

    #[test]
    fn distinct_values_skip_nulls() {
        let conn = test_db();
        insert_ticket(&conn, "new", "bug", "portal", "A", "alice", None, 1);
        insert_ticket(&conn, "assigned", "bug", "billing", "B", "bob", Some("root"), 2);
        insert_ticket(&conn, "new", "bug", "portal", "C", "bob", None, 3);

        assert_eq!(
            distinct_values(&conn, DistinctColumn::Application).unwrap(),
            vec!["billing", "portal"]
        );
        assert_eq!(
            distinct_values(&conn, DistinctColumn::SubmittedBy).unwrap(),
            vec!["alice", "bob"]
        );
        assert_eq!(
            distinct_values(&conn, DistinctColumn::AssignedTo).unwrap(),
            vec!["root"]
        );
    }

    #[test]
    fn list_tags_counts_usage() {
        let conn = test_db();
        let a = insert_ticket(&conn, "new", "bug", "portal", "A", "alice", None, 1);
        let b = insert_ticket(&conn, "new", "bug", "portal", "B", "alice", None, 2);
        insert_tag(&conn, a, "ui");
        insert_tag(&conn, b, "ui");
        insert_tag(&conn, b, "auth");

        let tags = list_tags(&conn).unwrap();
        assert_eq!(
            tags,
            vec![
                TagCount {
                    tag: "ui".to_string(),
                    count: 2
                },
                TagCount {
                    tag: "auth".to_string(),
                    count: 1
                },
            ]
        );
    }
}
