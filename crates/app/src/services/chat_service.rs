//! Chat service — team-scoped conversations with membership checks.

use std::sync::Arc;
use std::time::Duration;

use salesdesk_domain::channel::Channel;
use salesdesk_domain::chat::{ChatMessage, Conversation};
use salesdesk_domain::envelope::Envelope;
use salesdesk_domain::error::{
    AccessDeniedError, NotFoundError, SalesdeskError, ValidationError,
};
use salesdesk_domain::id::{ConversationId, UserId};
use salesdesk_domain::time::Timestamp;

use crate::hub::{EventHub, HubSettings, WaitGuard};
use crate::ports::{ChatStore, TeamDirectory};

/// Application service for posting and reading chat messages.
///
/// Every operation authorizes the subject against the conversation's owning
/// team before touching the store or the hub.
pub struct ChatService<S, D> {
    store: S,
    directory: D,
    hub: Arc<EventHub>,
    settings: HubSettings,
}

impl<S: ChatStore, D: TeamDirectory> ChatService<S, D> {
    /// Create a new service.
    pub fn new(store: S, directory: D, hub: Arc<EventHub>, settings: HubSettings) -> Self {
        Self {
            store,
            directory,
            hub,
            settings,
        }
    }

    /// Post a message: authorize, persist, then publish to the conversation
    /// channel.
    ///
    /// # Errors
    ///
    /// [`SalesdeskError::NotFound`] when the conversation does not exist,
    /// [`SalesdeskError::AccessDenied`] when the sender is not a member of
    /// the owning team, [`SalesdeskError::Validation`] for an empty body.
    #[tracing::instrument(skip(self, body))]
    pub async fn post_message(
        &self,
        sender: UserId,
        conversation_id: ConversationId,
        body: String,
    ) -> Result<ChatMessage, SalesdeskError> {
        if body.trim().is_empty() {
            return Err(ValidationError::EmptyBody.into());
        }
        let conversation = self.authorize(sender, conversation_id, "post to conversation").await?;

        let stored = self
            .store
            .save(ChatMessage::new(conversation.id, sender, body))
            .await?;

        let delivered = self
            .hub
            .publish(Channel::Conversation(conversation.id), &Envelope::from(stored.clone()));
        tracing::debug!(delivered, "chat message published");

        Ok(stored)
    }

    /// Messages strictly newer than `since`, oldest-first.
    ///
    /// # Errors
    ///
    /// Same authorization errors as [`post_message`](Self::post_message).
    #[tracing::instrument(skip(self))]
    pub async fn list_since(
        &self,
        user: UserId,
        conversation_id: ConversationId,
        since: Option<Timestamp>,
    ) -> Result<Vec<ChatMessage>, SalesdeskError> {
        self.authorize(user, conversation_id, "read conversation").await?;
        self.store.find_since(conversation_id, since).await
    }

    /// Full message history of a conversation, oldest-first.
    ///
    /// # Errors
    ///
    /// Same authorization errors as [`post_message`](Self::post_message).
    pub async fn list_all(
        &self,
        user: UserId,
        conversation_id: ConversationId,
    ) -> Result<Vec<ChatMessage>, SalesdeskError> {
        self.authorize(user, conversation_id, "read conversation").await?;
        self.store.find_all(conversation_id).await
    }

    /// Register a long-poll wait on the conversation channel.
    ///
    /// # Errors
    ///
    /// Authorization errors as above, or [`SalesdeskError::Validation`] for
    /// a zero timeout.
    pub async fn register_waiter(
        &self,
        user: UserId,
        conversation_id: ConversationId,
        timeout: Duration,
    ) -> Result<WaitGuard, SalesdeskError> {
        if timeout.is_zero() {
            return Err(ValidationError::ZeroTimeout.into());
        }
        self.authorize(user, conversation_id, "wait on conversation").await?;
        let timeout = timeout.min(self.settings.max_wait);
        Ok(self
            .hub
            .register(Channel::Conversation(conversation_id), timeout))
    }

    async fn authorize(
        &self,
        user: UserId,
        conversation_id: ConversationId,
        action: &'static str,
    ) -> Result<Conversation, SalesdeskError> {
        let conversation = self
            .store
            .conversation(conversation_id)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: "Conversation",
                id: conversation_id.to_string(),
            })?;

        if !self.directory.is_member(user, conversation.team_id).await? {
            return Err(AccessDeniedError {
                subject: user.to_string(),
                action,
            }
            .into());
        }
        Ok(conversation)
    }
}
