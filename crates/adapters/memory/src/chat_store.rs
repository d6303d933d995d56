//! In-memory chat store.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use salesdesk_app::ports::ChatStore;
use salesdesk_domain::chat::{ChatMessage, Conversation};
use salesdesk_domain::error::SalesdeskError;
use salesdesk_domain::id::ConversationId;
use salesdesk_domain::time::Timestamp;

/// Mutex-protected maps of conversations and messages.
#[derive(Default)]
pub struct MemoryChatStore {
    conversations: Mutex<HashMap<ConversationId, Conversation>>,
    messages: Mutex<Vec<ChatMessage>>,
}

impl MemoryChatStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn select(
        &self,
        conversation: ConversationId,
        since: Option<Timestamp>,
    ) -> Vec<ChatMessage> {
        let messages = self.messages.lock().expect("chat store poisoned");
        let mut result: Vec<ChatMessage> = messages
            .iter()
            .filter(|m| m.conversation_id == conversation)
            .filter(|m| since.is_none_or(|ts| m.sent_at > ts))
            .cloned()
            .collect();
        result.sort_by_key(|m| m.sent_at);
        result
    }
}

impl ChatStore for MemoryChatStore {
    fn save(
        &self,
        message: ChatMessage,
    ) -> impl Future<Output = Result<ChatMessage, SalesdeskError>> + Send {
        let mut messages = self.messages.lock().expect("chat store poisoned");
        messages.push(message.clone());
        async { Ok(message) }
    }

    fn find_since(
        &self,
        conversation: ConversationId,
        since: Option<Timestamp>,
    ) -> impl Future<Output = Result<Vec<ChatMessage>, SalesdeskError>> + Send {
        let result = self.select(conversation, since);
        async { Ok(result) }
    }

    fn find_all(
        &self,
        conversation: ConversationId,
    ) -> impl Future<Output = Result<Vec<ChatMessage>, SalesdeskError>> + Send {
        let result = self.select(conversation, None);
        async { Ok(result) }
    }

    fn conversation(
        &self,
        id: ConversationId,
    ) -> impl Future<Output = Result<Option<Conversation>, SalesdeskError>> + Send {
        let conversations = self.conversations.lock().expect("chat store poisoned");
        let result = conversations.get(&id).cloned();
        async { Ok(result) }
    }

    fn save_conversation(
        &self,
        conversation: Conversation,
    ) -> impl Future<Output = Result<Conversation, SalesdeskError>> + Send {
        let mut conversations = self.conversations.lock().expect("chat store poisoned");
        conversations.insert(conversation.id, conversation.clone());
        async { Ok(conversation) }
    }
}
