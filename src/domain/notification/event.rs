//! Live notification events.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{SessionId, Timestamp, UserId};

/// What kind of write produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Mail,
    Chat,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Mail => "mail",
            EventKind::Chat => "chat",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification fanned out to live subscribers.
///
/// Built once after a durable write and never mutated. Events are not
/// persisted: a subscriber that misses one re-reads the mail store.
///
/// `targets` comes from the persisted recipient links of the record that
/// triggered the event. The bus delivers to every subscriber regardless of
/// targets; narrowing to a user happens at the stream edge via [`Event::is_addressed_to`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    #[serde(rename = "type")]
    kind: EventKind,
    session_id: SessionId,
    targets: Vec<UserId>,
    data: serde_json::Value,
    occurred_at: Timestamp,
}

impl Event {
    /// Creates an event. Duplicate targets are collapsed, first occurrence wins.
    pub fn new(
        kind: EventKind,
        session_id: SessionId,
        targets: impl IntoIterator<Item = UserId>,
        data: serde_json::Value,
    ) -> Self {
        let mut unique: Vec<UserId> = Vec::new();
        for target in targets {
            if !unique.contains(&target) {
                unique.push(target);
            }
        }

        Self {
            kind,
            session_id,
            targets: unique,
            data,
            occurred_at: Timestamp::now(),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn targets(&self) -> &[UserId] {
        &self.targets
    }

    pub fn data(&self) -> &serde_json::Value {
        &self.data
    }

    pub fn occurred_at(&self) -> Timestamp {
        self.occurred_at
    }

    /// True if the event belongs to `session` and names `user` as a target.
    pub fn is_addressed_to(&self, session: &SessionId, user: &UserId) -> bool {
        &self.session_id == session && self.targets.contains(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn duplicate_targets_are_collapsed_in_order() {
        let event = Event::new(
            EventKind::Mail,
            SessionId::new("s1"),
            vec![user("u2"), user("u1"), user("u2")],
            json!({}),
        );

        assert_eq!(event.targets(), &[user("u2"), user("u1")]);
    }

    #[test]
    fn serializes_kind_as_type_field() {
        let event = Event::new(
            EventKind::Chat,
            SessionId::new("s1"),
            vec![user("u1")],
            json!({"content": "hi"}),
        );

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "chat");
        assert_eq!(value["session_id"], "s1");
        assert_eq!(value["targets"], json!(["u1"]));
        assert_eq!(value["data"]["content"], "hi");
    }

    #[test]
    fn addressing_requires_matching_session_and_target() {
        let event = Event::new(
            EventKind::Mail,
            SessionId::new("s1"),
            vec![user("u1")],
            json!({}),
        );

        assert!(event.is_addressed_to(&SessionId::new("s1"), &user("u1")));
        assert!(!event.is_addressed_to(&SessionId::new("s2"), &user("u1")));
        assert!(!event.is_addressed_to(&SessionId::new("s1"), &user("u9")));
    }
}
