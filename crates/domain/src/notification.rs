//! Notification — a short message pushed to a user or a whole team.

use serde::{Deserialize, Serialize};

use crate::id::{NotificationId, TeamId, UserId};
use crate::time::Timestamp;

/// Who a notification is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "id", rename_all = "snake_case")]
pub enum Audience {
    /// A single user.
    User(UserId),
    /// Every member of a team.
    Team(TeamId),
}

/// A persisted notification record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique identifier, assigned by the store on save.
    pub id: NotificationId,
    /// Delivery audience.
    pub audience: Audience,
    /// Short summary line.
    pub title: String,
    /// Full message body.
    pub body: String,
    /// Creation time, also the `list_since` ordering key.
    pub created_at: Timestamp,
}

impl Notification {
    /// Build a new notification stamped with the current time.
    #[must_use]
    pub fn new(audience: Audience, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: NotificationId::new(),
            audience,
            title: title.into(),
            body: body.into(),
            created_at: crate::time::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_roundtrip_through_serde_json() {
        let n = Notification::new(Audience::User(UserId::new()), "Invoice paid", "INV-42");
        let json = serde_json::to_string(&n).unwrap();
        let parsed: Notification = serde_json::from_str(&json).unwrap();
        assert_eq!(n, parsed);
    }

    #[test]
    fn should_tag_audience_scope_in_json() {
        let n = Notification::new(Audience::Team(TeamId::new()), "t", "b");
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["audience"]["scope"], "team");
    }
}
