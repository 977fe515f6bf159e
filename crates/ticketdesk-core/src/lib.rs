//! ticketdesk-core library.
//!
//! The ticket lifecycle and collaboration engine: status transitions, the
//! authorization policy gating them, the public/internal follow-up log,
//! the one-vote-per-user ledger, and ticket splitting. Every mutating
//! operation runs as one SQLite `BEGIN IMMEDIATE` transaction.
//!
//! # Conventions
//!
//! - **Errors**: domain operations return [`TicketError`]; store and config
//!   plumbing return `anyhow::Result` with context.
//! - **Logging**: `tracing` macros with structured fields (`ticket_id`,
//!   `actor`, `action`, `status`).

pub mod comments;
pub mod config;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod listing;
pub mod model;
pub mod policy;
pub mod split;
pub mod tickets;
pub mod users;
pub mod votes;

pub use comments::{add_comment, list_comments};
pub use db::query::{Scope, TicketFilter, UserRole};
pub use error::{ErrorCode, ErrorKind, TicketError};
pub use lifecycle::{Transition, apply_transition};
pub use listing::{list_filters, list_tags, list_tickets, ticket_detail};
pub use split::split_ticket;
pub use tickets::{create_ticket, update_ticket};
pub use votes::cast_vote;
