#![allow(dead_code)]

use std::path::PathBuf;

use rusqlite::Connection;
use tempfile::TempDir;
use ticketdesk_core::config::{CommentConfig, TicketConfig, store_path};
use ticketdesk_core::db::{DEFAULT_BUSY_TIMEOUT, open_store};
use ticketdesk_core::model::{Actor, NewTicket, Priority, Ticket, TicketType};
use ticketdesk_core::users::register_user;
use ticketdesk_core::{Transition, apply_transition, create_ticket};

/// An on-disk store in a private temp directory with three users:
/// `alice` and `bob` (regular) and `root` (administrator).
pub struct Fixture {
    _dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = store_path(dir.path());
        let mut conn = open_store(&path, DEFAULT_BUSY_TIMEOUT).expect("open store");
        for (name, admin) in [("alice", false), ("bob", false), ("root", true)] {
            register_user(&mut conn, name, admin).expect("register user");
        }
        Self { _dir: dir, path }
    }

    /// A fresh connection; each thread in a race gets its own.
    pub fn connect(&self) -> Connection {
        open_store(&self.path, DEFAULT_BUSY_TIMEOUT).expect("open store")
    }

    pub fn submit(&self, who: &str, description: &str) -> Ticket {
        let mut conn = self.connect();
        create_ticket(
            &mut conn,
            &Actor::user(who),
            &NewTicket {
                ticket_type: TicketType::Bug,
                priority: Priority::Normal,
                application: "portal".to_string(),
                description: description.to_string(),
                tags: vec!["web".to_string()],
            },
            &TicketConfig::default(),
        )
        .expect("create ticket")
    }
}

pub fn root() -> Actor {
    Actor::admin("root")
}

pub fn close(comment: &str) -> Transition {
    Transition::Close {
        comment: comment.to_string(),
        duplicate_of: None,
    }
}

pub fn reopen(comment: &str) -> Transition {
    Transition::Reopen {
        comment: comment.to_string(),
    }
}

pub fn apply(
    conn: &mut Connection,
    actor: &Actor,
    ticket_id: i64,
    transition: Transition,
) -> Result<Ticket, ticketdesk_core::TicketError> {
    apply_transition(conn, actor, ticket_id, transition, &CommentConfig::default())
}
