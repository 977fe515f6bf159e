use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered user as supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub is_admin: bool,
}

/// The identity behind an inbound request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Actor {
    /// Unauthenticated; may only read.
    #[default]
    Anonymous,
    User(User),
}

impl Actor {
    /// Convenience constructor for a regular (non-admin) user.
    #[must_use]
    pub fn user(username: impl Into<String>) -> Self {
        Self::User(User {
            username: username.into(),
            is_admin: false,
        })
    }

    /// Convenience constructor for an administrator.
    #[must_use]
    pub fn admin(username: impl Into<String>) -> Self {
        Self::User(User {
            username: username.into(),
            is_admin: true,
        })
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::User(user) => Some(user.username.as_str()),
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::User(_))
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::User(User { is_admin: true, .. }))
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("anonymous"),
            Self::User(user) => f.write_str(&user.username),
        }
    }
}
