//! Domain types: tickets, follow-ups and the actors that act on them.

pub mod follow_up;
pub mod ticket;
pub mod user;

pub use follow_up::{FollowUp, FollowUpAction, NewFollowUp, Visibility};
pub use ticket::{
    ChildSpec, InvalidTransition, NewTicket, ParseEnumError, Priority, Status, Ticket,
    TicketAction, TicketType, TicketUpdate,
};
pub use user::{Actor, User};
