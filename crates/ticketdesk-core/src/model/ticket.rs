use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Lifecycle status of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    New,
    Accepted,
    Assigned,
    Reopened,
    Closed,
    Duplicate,
    Split,
}

impl Status {
    /// Every status in display order.
    pub const ALL: [Self; 7] = [
        Self::New,
        Self::Accepted,
        Self::Assigned,
        Self::Reopened,
        Self::Closed,
        Self::Duplicate,
        Self::Split,
    ];

    /// Statuses listed under "open tickets".
    pub const OPEN: [Self; 4] = [Self::New, Self::Accepted, Self::Assigned, Self::Reopened];

    /// Statuses listed under "closed tickets".
    pub const INACTIVE: [Self; 3] = [Self::Closed, Self::Duplicate, Self::Split];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Accepted => "accepted",
            Self::Assigned => "assigned",
            Self::Reopened => "reopened",
            Self::Closed => "closed",
            Self::Duplicate => "duplicate",
            Self::Split => "split",
        }
    }

    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(
            self,
            Self::New | Self::Accepted | Self::Assigned | Self::Reopened
        )
    }

    /// `split` never leaves; `closed` and `duplicate` only leave via reopen.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Split)
    }

    /// Validate whether `action` may be applied to a ticket in this status.
    ///
    /// Legal sources:
    /// - `accept`, `assign`, `close`, `split`: any open status
    /// - `reopen`: `closed` or `duplicate`
    /// - `comment`: any status
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] when the action is not legal from `self`.
    pub const fn permits(self, action: TicketAction) -> Result<(), InvalidTransition> {
        let allowed = match action {
            TicketAction::Comment => true,
            TicketAction::Accept
            | TicketAction::Assign
            | TicketAction::Close
            | TicketAction::Split => self.is_open(),
            TicketAction::Reopen => matches!(self, Self::Closed | Self::Duplicate),
        };

        if allowed {
            Ok(())
        } else {
            Err(InvalidTransition {
                from: self,
                action,
                reason: if self.is_final() {
                    "split tickets accept no further transitions"
                } else {
                    "action not allowed by lifecycle rules"
                },
            })
        }
    }
}

/// The actions that drive the ticket lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketAction {
    Accept,
    Assign,
    Close,
    Reopen,
    Comment,
    Split,
}

impl TicketAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Assign => "assign",
            Self::Close => "close",
            Self::Reopen => "reopen",
            Self::Comment => "comment",
            Self::Split => "split",
        }
    }
}

/// What kind of request a ticket is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketType {
    #[default]
    Bug,
    Feature,
    Task,
}

impl TicketType {
    pub const ALL: [Self; 3] = [Self::Bug, Self::Feature, Self::Task];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::Feature => "feature",
            Self::Task => "task",
        }
    }

    /// Human label used in listings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bug => "Bug Report",
            Self::Feature => "Feature Request",
            Self::Task => "Task",
        }
    }
}

/// Ticket priority, ordered most urgent first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Normal,
    Low,
    Minor,
}

impl Priority {
    pub const ALL: [Self; 5] = [
        Self::Critical,
        Self::High,
        Self::Normal,
        Self::Low,
        Self::Minor,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Normal => "normal",
            Self::Low => "low",
            Self::Minor => "minor",
        }
    }

    /// Numeric rank, 1 being the most urgent.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Critical => 1,
            Self::High => 2,
            Self::Normal => 3,
            Self::Low => 4,
            Self::Minor => 5,
        }
    }
}

/// A tracked issue or request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub status: Status,
    pub ticket_type: TicketType,
    pub priority: Priority,
    pub application: String,
    pub description: String,
    pub submitted_by: String,
    pub assigned_to: Option<String>,
    pub vote_count: u32,
    pub parent_id: Option<i64>,
    pub duplicate_of: Option<i64>,
    pub tags: Vec<String>,
    pub created_at_us: i64,
    pub updated_at_us: i64,
}

/// Attributes supplied when a ticket is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTicket {
    pub ticket_type: TicketType,
    pub priority: Priority,
    pub application: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// Editable attributes; `None` leaves a field unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TicketUpdate {
    pub ticket_type: Option<TicketType>,
    pub priority: Option<Priority>,
    pub application: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl TicketUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ticket_type.is_none()
            && self.priority.is_none()
            && self.application.is_none()
            && self.description.is_none()
            && self.tags.is_none()
    }
}

/// Overrides for one child of a split; unset fields inherit from the parent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChildSpec {
    pub ticket_type: Option<TicketType>,
    pub priority: Option<Priority>,
    pub application: Option<String>,
    pub assigned_to: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Error returned when an action is not legal from the current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: Status,
    pub action: TicketAction,
    pub reason: &'static str,
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TicketAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseEnumError {
                expected: "status",
                got: s.to_string(),
            })
    }
}

impl FromStr for TicketType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "bug" | "bug report" | "bugreport" => Ok(Self::Bug),
            "feature" | "feature request" | "featurerequest" => Ok(Self::Feature),
            "task" => Ok(Self::Task),
            _ => Err(ParseEnumError {
                expected: "ticket type",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        Self::ALL
            .into_iter()
            .find(|priority| {
                priority.as_str() == normalized || priority.rank().to_string() == normalized
            })
            .ok_or_else(|| ParseEnumError {
                expected: "priority",
                got: s.to_string(),
            })
    }
}

impl FromStr for TicketAction {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "accept" | "accepted" => Ok(Self::Accept),
            "assign" | "assigned" | "re-assign" => Ok(Self::Assign),
            "close" | "closed" => Ok(Self::Close),
            "reopen" | "reopened" => Ok(Self::Reopen),
            "comment" => Ok(Self::Comment),
            "split" => Ok(Self::Split),
            _ => Err(ParseEnumError {
                expected: "action",
                got: s.to_string(),
            }),
        }
    }
}
