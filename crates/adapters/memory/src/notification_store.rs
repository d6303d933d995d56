//! In-memory notification store.

use std::future::Future;
use std::sync::Mutex;

use salesdesk_app::ports::NotificationStore;
use salesdesk_domain::error::SalesdeskError;
use salesdesk_domain::id::{TeamId, UserId};
use salesdesk_domain::notification::{Audience, Notification};
use salesdesk_domain::time::Timestamp;

/// Mutex-protected vector of notifications.
#[derive(Default)]
pub struct MemoryNotificationStore {
    rows: Mutex<Vec<Notification>>,
}

impl MemoryNotificationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotificationStore for MemoryNotificationStore {
    fn save(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<Notification, SalesdeskError>> + Send {
        let mut rows = self.rows.lock().expect("notification store poisoned");
        rows.push(notification.clone());
        async { Ok(notification) }
    }

    fn find_since(
        &self,
        user: UserId,
        teams: Vec<TeamId>,
        since: Option<Timestamp>,
    ) -> impl Future<Output = Result<Vec<Notification>, SalesdeskError>> + Send {
        let rows = self.rows.lock().expect("notification store poisoned");
        let mut visible: Vec<Notification> = rows
            .iter()
            .filter(|n| match n.audience {
                Audience::User(target) => target == user,
                Audience::Team(team) => teams.contains(&team),
            })
            .filter(|n| since.is_none_or(|ts| n.created_at > ts))
            .cloned()
            .collect();
        visible.sort_by_key(|n| n.created_at);
        async { Ok(visible) }
    }
}
