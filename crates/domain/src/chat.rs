//! Chat — conversations and the messages exchanged within them.

use serde::{Deserialize, Serialize};

use crate::id::{ConversationId, MessageId, TeamId, UserId};
use crate::time::Timestamp;

/// A chat conversation, owned by a team.
///
/// Membership of the owning team is the authorization boundary for posting
/// and reading messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique identifier.
    pub id: ConversationId,
    /// Team whose members may participate.
    pub team_id: TeamId,
    /// Human-readable subject.
    pub subject: String,
}

/// One message inside a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique identifier, assigned by the store on save.
    pub id: MessageId,
    /// Conversation this message belongs to.
    pub conversation_id: ConversationId,
    /// Author.
    pub sender_id: UserId,
    /// Message text.
    pub body: String,
    /// Send time, also the `list_since` ordering key.
    pub sent_at: Timestamp,
}

impl ChatMessage {
    /// Build a new message stamped with the current time.
    #[must_use]
    pub fn new(
        conversation_id: ConversationId,
        sender_id: UserId,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            conversation_id,
            sender_id,
            body: body.into(),
            sent_at: crate::time::now(),
        }
    }
}
