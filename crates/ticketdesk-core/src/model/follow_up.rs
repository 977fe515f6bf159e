use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::ticket::ParseEnumError;

/// Who may read a follow-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    /// Visible only to administrators and the ticket's submitter.
    Internal,
}

impl Visibility {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
        }
    }
}

/// The lifecycle event a follow-up records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpAction {
    None,
    Closed,
    Reopened,
    Accepted,
    Assigned,
    Comment,
    Split,
}

impl FollowUpAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Closed => "closed",
            Self::Reopened => "reopened",
            Self::Accepted => "accepted",
            Self::Assigned => "assigned",
            Self::Comment => "comment",
            Self::Split => "split",
        }
    }

    /// Close and reopen must always carry an explanation.
    #[must_use]
    pub const fn requires_body(self) -> bool {
        matches!(self, Self::Closed | Self::Reopened)
    }
}

/// An immutable comment or status-change annotation on a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUp {
    pub id: i64,
    pub ticket_id: i64,
    pub author: String,
    pub body: String,
    pub visibility: Visibility,
    pub action: FollowUpAction,
    pub created_at_us: i64,
}

/// A follow-up waiting to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFollowUp {
    pub ticket_id: i64,
    pub author: String,
    pub body: String,
    pub visibility: Visibility,
    pub action: FollowUpAction,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FollowUpAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "internal" | "private" => Ok(Self::Internal),
            _ => Err(ParseEnumError {
                expected: "visibility",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for FollowUpAction {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "closed" => Ok(Self::Closed),
            "reopened" => Ok(Self::Reopened),
            "accepted" => Ok(Self::Accepted),
            "assigned" => Ok(Self::Assigned),
            "comment" => Ok(Self::Comment),
            "split" => Ok(Self::Split),
            _ => Err(ParseEnumError {
                expected: "follow-up action",
                got: s.to_string(),
            }),
        }
    }
}
