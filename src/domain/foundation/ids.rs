//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Session identifier used when a request carries none.
///
/// Rows and files under this identifier are never removed by session cleanup.
pub const DEFAULT_SESSION_ID: &str = "default";

/// True if `segment` can be used as a single directory or file name.
pub fn is_path_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\', '\0'])
}

/// Partition identifier stamped on every mail, chat, and attachment row.
///
/// A session has no existence of its own: it is the set of rows and files
/// carrying this identifier. Any string is accepted so that cleanup can be
/// asked about empty or reserved identifiers and refuse them explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a SessionId from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the reserved default session.
    pub fn default_session() -> Self {
        Self(DEFAULT_SESSION_ID.to_string())
    }

    /// Resolves a session from an optional header value, falling back to the default session.
    pub fn from_header(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Self(v.to_string()),
            _ => Self::default_session(),
        }
    }

    /// True for the empty identifier and the reserved default session.
    pub fn is_reserved(&self) -> bool {
        self.0.is_empty() || self.0 == DEFAULT_SESSION_ID
    }

    /// True if the identifier can be used as a single path segment.
    pub fn is_path_safe(&self) -> bool {
        is_path_segment(&self.0)
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// User identifier (caller identity is passed in, not verified).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a mail.
    MailId
);
uuid_id!(
    /// Unique identifier for a mail-to-recipient link.
    RecipientLinkId
);
uuid_id!(
    /// Unique identifier for an uploaded attachment.
    AttachmentId
);
uuid_id!(
    /// Unique identifier for a chat message.
    ChatMessageId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_from_missing_header_is_default() {
        assert_eq!(SessionId::from_header(None), SessionId::default_session());
        assert_eq!(SessionId::from_header(Some("  ")), SessionId::default_session());
        assert_eq!(SessionId::from_header(Some("s1")).as_str(), "s1");
    }

    #[test]
    fn empty_and_default_sessions_are_reserved() {
        assert!(SessionId::new("").is_reserved());
        assert!(SessionId::default_session().is_reserved());
        assert!(!SessionId::new("s1").is_reserved());
    }

    #[test]
    fn path_safety_rejects_separators_and_dots() {
        assert!(SessionId::new("team-a_2024").is_path_safe());
        assert!(!SessionId::new("..").is_path_safe());
        assert!(!SessionId::new("a/b").is_path_safe());
        assert!(!SessionId::new("a\\b").is_path_safe());
        assert!(!SessionId::new("").is_path_safe());
    }

    #[test]
    fn path_segment_accepts_plain_names_only() {
        assert!(is_path_segment("doc-1"));
        assert!(!is_path_segment(""));
        assert!(!is_path_segment("."));
        assert!(!is_path_segment("a/b"));
        assert!(!is_path_segment("a\\b"));
    }

    #[test]
    fn session_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&SessionId::new("s1")).unwrap();
        assert_eq!(json, "\"s1\"");
    }

    #[test]
    fn user_id_rejects_blank() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("   ").is_err());
        assert_eq!(UserId::new("u1").unwrap().as_str(), "u1");
    }

    #[test]
    fn mail_id_parses_from_valid_string() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: MailId = uuid_str.parse().unwrap();
        assert_eq!(id.to_string(), uuid_str);
        assert!("not-a-uuid".parse::<MailId>().is_err());
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(AttachmentId::new(), AttachmentId::new());
        assert_ne!(ChatMessageId::new(), ChatMessageId::new());
    }
}
