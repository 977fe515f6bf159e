use std::fmt;

/// Machine-readable error codes surfaced by the boundary layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    Forbidden,
    TicketNotFound,
    UserNotFound,
    InvalidStateTransition,
    MissingComment,
    InvalidField,
    StorageFailure,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::Forbidden => "E2001",
            Self::TicketNotFound => "E3001",
            Self::UserNotFound => "E3002",
            Self::InvalidStateTransition => "E4001",
            Self::MissingComment => "E5001",
            Self::InvalidField => "E5002",
            Self::StorageFailure => "E8001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Project not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::Forbidden => "Actor lacks the required privilege",
            Self::TicketNotFound => "Ticket not found",
            Self::UserNotFound => "User not found",
            Self::InvalidStateTransition => "Invalid state transition",
            Self::MissingComment => "A comment is required",
            Self::InvalidField => "Invalid field value",
            Self::StorageFailure => "Ticket store failure",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `td init` to create a ticket store here."),
            Self::ConfigParseError => Some("Fix syntax in .ticketdesk/config.toml and retry."),
            Self::Forbidden => {
                Some("Ask an administrator, or act as the ticket's submitter where allowed.")
            }
            Self::TicketNotFound => Some("Run `td list` to see existing ticket ids."),
            Self::UserNotFound => Some("Register the user with `td user add <name>`."),
            Self::InvalidStateTransition => Some(
                "Open tickets (new, accepted, assigned, reopened) can be accepted, assigned, \
                 closed or split; closed and duplicate tickets can only be reopened; split \
                 tickets are final.",
            ),
            Self::MissingComment => Some("Pass a non-empty comment explaining the change."),
            Self::InvalidField => None,
            Self::StorageFailure => Some("Check disk space and permissions on .ticketdesk/."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The taxonomy a caller branches on when handling a [`TicketError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Authorization,
    Validation,
    NotFound,
    InvalidState,
    /// Storage or configuration failure; never retried or masked.
    Fatal,
}

/// Errors raised by ticket operations.
///
/// None of these leave partial state behind: every write runs inside a
/// transaction that is rolled back when the error propagates.
#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    /// The actor lacks the privilege required for the action.
    #[error("{actor} may not {action}")]
    Authorization { actor: String, action: &'static str },

    /// A required field is missing or malformed.
    #[error("invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
        code: ErrorCode,
    },

    /// A ticket id does not resolve.
    #[error("ticket #{0} not found")]
    TicketNotFound(i64),

    /// A username does not resolve.
    #[error("user '{0}' not found")]
    UserNotFound(String),

    /// The action is not legal from the ticket's current status.
    #[error("cannot {action} ticket #{ticket_id} while it is {status}")]
    InvalidState {
        ticket_id: i64,
        action: &'static str,
        status: String,
    },

    /// Unexpected storage failure.
    #[error("ticket store error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(String),
}

impl TicketError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
            code: ErrorCode::InvalidField,
        }
    }

    pub(crate) fn missing_comment(action: &'static str) -> Self {
        Self::Validation {
            field: "comment",
            reason: format!("a comment is required to {action} a ticket"),
            code: ErrorCode::MissingComment,
        }
    }

    /// Which of the taxonomy kinds this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Authorization { .. } => ErrorKind::Authorization,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::TicketNotFound(_) | Self::UserNotFound(_) => ErrorKind::NotFound,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::Storage(_) | Self::Config(_) => ErrorKind::Fatal,
        }
    }

    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Authorization { .. } => ErrorCode::Forbidden,
            Self::Validation { code, .. } => *code,
            Self::TicketNotFound(_) => ErrorCode::TicketNotFound,
            Self::UserNotFound(_) => ErrorCode::UserNotFound,
            Self::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            Self::Storage(_) => ErrorCode::StorageFailure,
            Self::Config(_) => ErrorCode::ConfigParseError,
        }
    }

    /// Remediation hint for the boundary layer.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, ErrorKind, TicketError};
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::NotInitialized,
            ErrorCode::ConfigParseError,
            ErrorCode::Forbidden,
            ErrorCode::TicketNotFound,
            ErrorCode::UserNotFound,
            ErrorCode::InvalidStateTransition,
            ErrorCode::MissingComment,
            ErrorCode::InvalidField,
            ErrorCode::StorageFailure,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::InvalidStateTransition.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn kinds_follow_taxonomy() {
        let forbidden = TicketError::Authorization {
            actor: "anonymous".to_string(),
            action: "vote",
        };
        assert_eq!(forbidden.kind(), ErrorKind::Authorization);
        assert_eq!(forbidden.to_string(), "anonymous may not vote");

        let missing = TicketError::missing_comment("close");
        assert_eq!(missing.kind(), ErrorKind::Validation);
        assert_eq!(missing.code(), ErrorCode::MissingComment);

        assert_eq!(TicketError::TicketNotFound(7).kind(), ErrorKind::NotFound);
        assert_eq!(
            TicketError::UserNotFound("ghost".to_string()).code(),
            ErrorCode::UserNotFound
        );

        let storage = TicketError::from(rusqlite::Error::QueryReturnedNoRows);
        assert_eq!(storage.kind(), ErrorKind::Fatal);
    }
}
