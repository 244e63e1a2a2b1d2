use serde::{Deserialize, Serialize};
use std::fmt;

/// Who produced a turn.
///
/// Exactly two variants: everything a conversation stores is either the
/// visitor or the receptionist. Tool/system roles never reach the turn store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Visitor input
    User,
    /// Receptionist response
    Assistant,
}

impl Role {
    /// Returns the string representation of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Total parse from an arbitrary stored role string.
    ///
    /// Matches "user" case-insensitively; every other value (including
    /// "model", "bot", or garbage) collapses to `Assistant`. This is a
    /// deliberate data-coercion policy: a session replayed from storage must
    /// never fail on an unknown role, it just renders the turn on the
    /// assistant side.
    pub fn parse_lossy(s: &str) -> Role {
        if s.eq_ignore_ascii_case("user") {
            Role::User
        } else {
            Role::Assistant
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One exchange unit within a session.
///
/// Immutable once appended to the turn store; the sequence of turns under a
/// session id is append-only and insertion order is chronological order.
/// Consecutive same-role turns are tolerated (no alternation invariant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    /// Creates a new turn with the specified role and content
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a visitor turn
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates a receptionist turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}
