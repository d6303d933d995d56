//! Shared application state for axum handlers.

use std::sync::Arc;

use salesdesk_app::ports::{ChatStore, NotificationStore, TeamDirectory};
use salesdesk_app::services::chat_service::ChatService;
use salesdesk_app::services::notification_service::NotificationService;

/// Application state shared across all axum handlers.
///
/// Generic over the store and directory port types to avoid dynamic
/// dispatch. `Clone` is implemented manually so the underlying services do
/// not need to be `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<NS, CS, D> {
    /// Notification use-cases.
    pub notification_service: Arc<NotificationService<NS, D>>,
    /// Chat use-cases.
    pub chat_service: Arc<ChatService<CS, D>>,
}

impl<NS, CS, D> Clone for AppState<NS, CS, D> {
    fn clone(&self) -> Self {
        Self {
            notification_service: Arc::clone(&self.notification_service),
            chat_service: Arc::clone(&self.chat_service),
        }
    }
}

impl<NS, CS, D> AppState<NS, CS, D>
where
    NS: NotificationStore + Send + Sync + 'static,
    CS: ChatStore + Send + Sync + 'static,
    D: TeamDirectory + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        notification_service: NotificationService<NS, D>,
        chat_service: ChatService<CS, D>,
    ) -> Self {
        Self {
            notification_service: Arc::new(notification_service),
            chat_service: Arc::new(chat_service),
        }
    }
}
