//! Store ports — persistence for notifications and chat.
//!
//! Persistence of business entities is an external concern; the services in
//! this crate only need these narrow query/save surfaces. Producers persist
//! *before* publishing to the hub, so `find_since` is the recovery path for
//! any envelope a client missed.

use std::future::Future;

use salesdesk_domain::chat::{ChatMessage, Conversation};
use salesdesk_domain::error::SalesdeskError;
use salesdesk_domain::id::{ConversationId, TeamId, UserId};
use salesdesk_domain::notification::Notification;
use salesdesk_domain::time::Timestamp;

/// Repository for persisted [`Notification`]s.
pub trait NotificationStore {
    /// Persist a new notification, returning it with its assigned id.
    fn save(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<Notification, SalesdeskError>> + Send;

    /// Notifications visible to `user` (addressed to the user directly or to
    /// any of `teams`) with a timestamp strictly greater than `since`,
    /// ordered oldest-first. `None` means "from the beginning".
    fn find_since(
        &self,
        user: UserId,
        teams: Vec<TeamId>,
        since: Option<Timestamp>,
    ) -> impl Future<Output = Result<Vec<Notification>, SalesdeskError>> + Send;
}

impl<T: NotificationStore + Send + Sync> NotificationStore for std::sync::Arc<T> {
    fn save(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<Notification, SalesdeskError>> + Send {
        (**self).save(notification)
    }

    fn find_since(
        &self,
        user: UserId,
        teams: Vec<TeamId>,
        since: Option<Timestamp>,
    ) -> impl Future<Output = Result<Vec<Notification>, SalesdeskError>> + Send {
        (**self).find_since(user, teams, since)
    }
}

/// Repository for conversations and their messages.
pub trait ChatStore {
    /// Persist a new message, returning it with its assigned id.
    fn save(
        &self,
        message: ChatMessage,
    ) -> impl Future<Output = Result<ChatMessage, SalesdeskError>> + Send;

    /// Messages of `conversation` strictly newer than `since`, oldest-first.
    fn find_since(
        &self,
        conversation: ConversationId,
        since: Option<Timestamp>,
    ) -> impl Future<Output = Result<Vec<ChatMessage>, SalesdeskError>> + Send;

    /// All messages of `conversation`, oldest-first.
    fn find_all(
        &self,
        conversation: ConversationId,
    ) -> impl Future<Output = Result<Vec<ChatMessage>, SalesdeskError>> + Send;

    /// Look up a conversation by id.
    fn conversation(
        &self,
        id: ConversationId,
    ) -> impl Future<Output = Result<Option<Conversation>, SalesdeskError>> + Send;

    /// Persist a new conversation.
    fn save_conversation(
        &self,
        conversation: Conversation,
    ) -> impl Future<Output = Result<Conversation, SalesdeskError>> + Send;
}

impl<T: ChatStore + Send + Sync> ChatStore for std::sync::Arc<T> {
    fn save(
        &self,
        message: ChatMessage,
    ) -> impl Future<Output = Result<ChatMessage, SalesdeskError>> + Send {
        (**self).save(message)
    }

    fn find_since(
        &self,
        conversation: ConversationId,
        since: Option<Timestamp>,
    ) -> impl Future<Output = Result<Vec<ChatMessage>, SalesdeskError>> + Send {
        (**self).find_since(conversation, since)
    }

    fn find_all(
        &self,
        conversation: ConversationId,
    ) -> impl Future<Output = Result<Vec<ChatMessage>, SalesdeskError>> + Send {
        (**self).find_all(conversation)
    }

    fn conversation(
        &self,
        id: ConversationId,
    ) -> impl Future<Output = Result<Option<Conversation>, SalesdeskError>> + Send {
        (**self).conversation(id)
    }

    fn save_conversation(
        &self,
        conversation: Conversation,
    ) -> impl Future<Output = Result<Conversation, SalesdeskError>> + Send {
        (**self).save_conversation(conversation)
    }
}
