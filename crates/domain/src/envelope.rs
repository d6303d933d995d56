//! Envelope — the transient payload carried through the hub.
//!
//! Envelopes are never stored by the hub; the producer persists the
//! underlying record *before* publishing, so a missed envelope is always
//! recoverable through a `list_since` query.

use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;
use crate::notification::Notification;
use crate::time::Timestamp;

/// What an envelope carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnvelopePayload {
    /// A user- or team-targeted notification.
    Notification(Notification),
    /// A chat message.
    ChatMessage(ChatMessage),
}

/// A single event as delivered to a pending long-poll wait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// The event payload.
    pub payload: EnvelopePayload,
    /// When the envelope was published.
    pub created_at: Timestamp,
}

impl Envelope {
    /// Wrap a payload with the current time.
    #[must_use]
    pub fn new(payload: EnvelopePayload) -> Self {
        Self {
            payload,
            created_at: crate::time::now(),
        }
    }
}

impl From<Notification> for Envelope {
    fn from(notification: Notification) -> Self {
        Self::new(EnvelopePayload::Notification(notification))
    }
}

impl From<ChatMessage> for Envelope {
    fn from(message: ChatMessage) -> Self {
        Self::new(EnvelopePayload::ChatMessage(message))
    }
}
