//! Channel — the subscription scope for long-poll delivery.
//!
//! Channels are never persisted; they exist only as keys in the hub's
//! in-memory registry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{ConversationId, TeamId, UserId};

/// Subscription scope for hub delivery.
///
/// A notification targeted at a team is fanned out to each member's
/// [`Channel::User`] at publish time; only chat uses a shared
/// [`Channel::Conversation`] scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Personal channel of a single user.
    User(UserId),
    /// Shared channel of a team (reserved for team-wide broadcasts).
    Team(TeamId),
    /// Channel of one chat conversation.
    Conversation(ConversationId),
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "user-{id}"),
            Self::Team(id) => write!(f, "team-{id}"),
            Self::Conversation(id) => write!(f, "conv-{id}"),
        }
    }
}
