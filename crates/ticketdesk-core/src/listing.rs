//! Read-side views: filtered listings, the ticket detail view, filter
//! options and tag counts.
//!
//! Nothing here mutates the store. Each view is a plain function composed
//! from the query helpers in [`crate::db::query`].

use rusqlite::Connection;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::comments::list_comments;
use crate::config::ListingConfig;
use crate::db::query::{self, DistinctColumn, TagCount, TicketFilter};
use crate::error::TicketError;
use crate::model::{Actor, FollowUp, Priority, Status, Ticket, TicketType};
use crate::tickets::load_ticket;

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TicketPage {
    pub tickets: Vec<Ticket>,
    /// Matches before `limit`/`offset` were applied.
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

/// Everything the detail view of one ticket shows.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TicketDetail {
    pub ticket: Ticket,
    pub tags: Vec<String>,
    pub parent: Option<Ticket>,
    pub children: Vec<Ticket>,
    /// Follow-ups visible to the requester, newest first.
    pub comments: Vec<FollowUp>,
}

/// Filter name to available values, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterOptions {
    entries: Vec<(&'static str, Vec<String>)>,
}

impl FilterOptions {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, values)| values.as_slice())
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(key, _)| *key).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (*key, values.as_slice()))
    }
}

impl Serialize for FilterOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

/// Tickets matching `filter`, newest first.
///
/// # Errors
///
/// Returns a storage error if the read fails.
pub fn list_tickets(conn: &Connection, filter: &TicketFilter) -> Result<Vec<Ticket>, TicketError> {
    Ok(query::list_tickets(conn, filter)?)
}

/// One page of tickets matching `filter`, using the configured page size
/// when the filter sets no limit.
///
/// # Errors
///
/// Returns a storage error if the read fails.
pub fn list_page(
    conn: &Connection,
    filter: &TicketFilter,
    listing: &ListingConfig,
) -> Result<TicketPage, TicketError> {
    let limit = filter.limit.unwrap_or(listing.page_size);
    let offset = filter.offset.unwrap_or(0);
    let paged = TicketFilter {
        limit: Some(limit),
        offset: Some(offset),
        ..filter.clone()
    };

    let tickets = query::list_tickets(conn, &paged)?;
    let total = query::count_tickets(conn, filter)?;
    tracing::debug!(total, limit, offset, "listed tickets");

    Ok(TicketPage {
        tickets,
        total,
        limit,
        offset,
    })
}

/// The detail view of one ticket as `requester` may see it.
///
/// # Errors
///
/// Returns [`TicketError::TicketNotFound`] for unknown tickets.
pub fn ticket_detail(
    conn: &Connection,
    requester: &Actor,
    ticket_id: i64,
) -> Result<TicketDetail, TicketError> {
    let ticket = load_ticket(conn, ticket_id)?;
    let parent = match ticket.parent_id {
        Some(parent_id) => query::get_ticket(conn, parent_id)?,
        None => None,
    };
    let children = query::get_children(conn, ticket_id)?;
    let comments = list_comments(conn, requester, ticket_id)?;

    Ok(TicketDetail {
        tags: ticket.tags.clone(),
        ticket,
        parent,
        children,
        comments,
    })
}

/// Values available to each listing filter: status, application,
/// priority, type, submitted_by, assigned_to.
///
/// Status, priority and type always list every declared choice, types by
/// their display label. The other three list values present in the store.
///
/// # Errors
///
/// Returns a storage error if an aggregate query fails.
pub fn list_filters(conn: &Connection) -> Result<FilterOptions, TicketError> {
    build_filters(conn, true)
}

/// [`list_filters`] without the `type` entry, for listings already scoped
/// to one ticket type.
///
/// # Errors
///
/// Returns a storage error if an aggregate query fails.
pub fn list_filters_without_type(conn: &Connection) -> Result<FilterOptions, TicketError> {
    build_filters(conn, false)
}

/// Tag usage counts, most used first.
///
/// # Errors
///
/// Returns a storage error if the aggregate query fails.
pub fn list_tags(conn: &Connection) -> Result<Vec<TagCount>, TicketError> {
    Ok(query::list_tags(conn)?)
}

fn declared<T: Copy>(all: &[T], name: fn(T) -> &'static str) -> Vec<String> {
    all.iter().map(|value| name(*value).to_string()).collect()
}

fn build_filters(conn: &Connection, include_type: bool) -> Result<FilterOptions, TicketError> {
    let mut entries = vec![
        ("status", declared(&Status::ALL, Status::as_str)),
        (
            "application",
            query::distinct_values(conn, DistinctColumn::Application)?,
        ),
        ("priority", declared(&Priority::ALL, Priority::as_str)),
    ];

    if include_type {
        entries.push(("type", declared(&TicketType::ALL, TicketType::label)));
    }

    entries.push((
        "submitted_by",
        query::distinct_values(conn, DistinctColumn::SubmittedBy)?,
    ));
    entries.push((
        "assigned_to",
        query::distinct_values(conn, DistinctColumn::AssignedTo)?,
    ));

    Ok(FilterOptions { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CommentConfig, TicketConfig};
    use crate::db::open_in_memory;
    use crate::db::query::{Scope, UserRole};
    use crate::lifecycle::{Transition, apply_transition};
    use crate::model::{ChildSpec, NewTicket};
    use crate::split::split_ticket;
    use crate::tickets::create_ticket;
    use crate::users::register_user;

    fn setup() -> Connection {
        let mut conn = open_in_memory().unwrap();
        for (name, admin) in [("alice", false), ("bob", false), ("root", true)] {
            register_user(&mut conn, name, admin).unwrap();
        }
        conn
    }

    fn submit(
        conn: &mut Connection,
        who: &str,
        ticket_type: TicketType,
        priority: Priority,
        application: &str,
        description: &str,
    ) -> Ticket {
        create_ticket(
            conn,
            &Actor::user(who),
            &NewTicket {
                ticket_type,
                priority,
                application: application.to_string(),
                description: description.to_string(),
                tags: vec!["triage".to_string()],
            },
            &TicketConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn filters_list_every_declared_choice() {
        let mut conn = setup();
        submit(&mut conn, "alice", TicketType::Feature, Priority::Low, "reports", "A");
        let bug = submit(&mut conn, "bob", TicketType::Bug, Priority::Critical, "billing", "B");
        apply_transition(
            &mut conn,
            &Actor::admin("root"),
            bug.id,
            Transition::Assign {
                to: "root".to_string(),
                comment: None,
            },
            &CommentConfig::default(),
        )
        .unwrap();

        let filters = list_filters(&conn).unwrap();
        assert_eq!(
            filters.names(),
            vec!["status", "application", "priority", "type", "submitted_by", "assigned_to"]
        );
        assert_eq!(
            filters.get("status").unwrap(),
            ["new", "accepted", "assigned", "reopened", "closed", "duplicate", "split"]
        );
        assert_eq!(filters.get("application").unwrap(), ["billing", "reports"]);
        assert_eq!(
            filters.get("priority").unwrap(),
            ["critical", "high", "normal", "low", "minor"]
        );
        assert_eq!(
            filters.get("type").unwrap(),
            ["Bug Report", "Feature Request", "Task"]
        );
        assert_eq!(filters.get("submitted_by").unwrap(), ["alice", "bob"]);
        assert_eq!(filters.get("assigned_to").unwrap(), ["root"]);

        let json = serde_json::to_string(&filters).unwrap();
        assert!(json.starts_with("{\"status\":"));

        let scoped = list_filters_without_type(&conn).unwrap();
        assert!(scoped.get("type").is_none());
        assert_eq!(scoped.names().len(), 5);
    }

    #[test]
    fn empty_store_still_lists_declared_choices() {
        let conn = setup();
        let filters = list_filters(&conn).unwrap();
        assert_eq!(filters.get("status").unwrap().len(), Status::ALL.len());
        assert_eq!(filters.get("priority").unwrap().len(), Priority::ALL.len());
        assert_eq!(filters.get("type").unwrap().len(), TicketType::ALL.len());
        for name in ["application", "submitted_by", "assigned_to"] {
            assert!(filters.get(name).unwrap().is_empty(), "{name}");
        }
    }

    #[test]
    fn page_uses_configured_size() {
        let mut conn = setup();
        for idx in 0..5 {
            submit(
                &mut conn,
                "alice",
                TicketType::Bug,
                Priority::Normal,
                "portal",
                &format!("Issue {idx}"),
            );
        }
        let page = list_page(
            &conn,
            &TicketFilter::default(),
            &ListingConfig { page_size: 2 },
        )
        .unwrap();
        assert_eq!(page.tickets.len(), 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.limit, 2);
        assert_eq!(page.offset, 0);
        assert_eq!(page.tickets[0].description, "Issue 4");
    }

    #[test]
    fn my_tickets_view() {
        let mut conn = setup();
        let mine = submit(&mut conn, "alice", TicketType::Bug, Priority::Normal, "portal", "Mine");
        submit(&mut conn, "bob", TicketType::Bug, Priority::Normal, "portal", "Theirs");

        let found = list_tickets(
            &conn,
            &TicketFilter {
                scope: Scope::Open,
                user: Some("alice".to_string()),
                role: UserRole::Either,
                ..TicketFilter::default()
            },
        )
        .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, mine.id);
    }

    #[test]
    fn detail_links_parent_and_children() {
        let mut conn = setup();
        let parent = submit(&mut conn, "alice", TicketType::Task, Priority::Normal, "ops", "Both");
        let (first, second) = split_ticket(
            &mut conn,
            &Actor::admin("root"),
            parent.id,
            &ChildSpec::default(),
            &ChildSpec::default(),
            &TicketConfig::default(),
        )
        .unwrap();

        let detail = ticket_detail(&conn, &Actor::Anonymous, parent.id).unwrap();
        assert_eq!(detail.ticket.status, Status::Split);
        assert_eq!(
            detail.children.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );
        assert!(detail.parent.is_none());
        assert_eq!(detail.tags, vec!["triage".to_string()]);
        assert_eq!(detail.comments.len(), 1);

        let child = ticket_detail(&conn, &Actor::Anonymous, first.id).unwrap();
        assert_eq!(child.parent.map(|p| p.id), Some(parent.id));
        assert!(child.children.is_empty());
        assert!(child.comments.is_empty());
    }

    #[test]
    fn tag_counts() {
        let mut conn = setup();
        submit(&mut conn, "alice", TicketType::Bug, Priority::Normal, "portal", "A");
        submit(&mut conn, "bob", TicketType::Bug, Priority::Normal, "portal", "B");
        let tags = list_tags(&conn).unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].tag, "triage");
        assert_eq!(tags[0].count, 2);
    }
}
