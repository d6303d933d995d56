//! Notification service — validate, persist, then publish.

use std::sync::Arc;
use std::time::Duration;

use salesdesk_domain::channel::Channel;
use salesdesk_domain::envelope::Envelope;
use salesdesk_domain::error::{SalesdeskError, ValidationError};
use salesdesk_domain::id::UserId;
use salesdesk_domain::notification::{Audience, Notification};
use salesdesk_domain::time::Timestamp;

use crate::hub::{EventHub, HubSettings, WaitGuard};
use crate::ports::{NotificationStore, TeamDirectory};

/// Application service for creating and querying notifications.
///
/// Fan-out policy: a team-targeted notification publishes to every member's
/// personal [`Channel::User`] at publish time; there is no shared team
/// channel. [`list_since`](Self::list_since) visibility follows the same
/// rule, so a client that missed an envelope recovers it by querying with
/// its own user id.
pub struct NotificationService<S, D> {
    store: S,
    directory: D,
    hub: Arc<EventHub>,
    settings: HubSettings,
}

impl<S: NotificationStore, D: TeamDirectory> NotificationService<S, D> {
    /// Create a new service.
    pub fn new(store: S, directory: D, hub: Arc<EventHub>, settings: HubSettings) -> Self {
        Self {
            store,
            directory,
            hub,
            settings,
        }
    }

    /// Persist a notification, then publish it to every interested channel.
    ///
    /// Persistence happens strictly before publishing: a waiter that misses
    /// the envelope can always recover it through
    /// [`list_since`](Self::list_since).
    ///
    /// # Errors
    ///
    /// Returns [`SalesdeskError::Validation`] when the body is empty, or a
    /// store/directory error.
    #[tracing::instrument(skip(self, notification), fields(audience = ?notification.audience))]
    pub async fn create(&self, notification: Notification) -> Result<Notification, SalesdeskError> {
        if notification.body.trim().is_empty() {
            return Err(ValidationError::EmptyBody.into());
        }

        let stored = self.store.save(notification).await?;
        let envelope = Envelope::from(stored.clone());

        let delivered = match stored.audience {
            Audience::User(user) => self.hub.publish(Channel::User(user), &envelope),
            Audience::Team(team) => {
                let mut delivered = 0;
                for member in self.directory.members_of(team).await? {
                    delivered += self.hub.publish(Channel::User(member), &envelope);
                }
                delivered
            }
        };
        tracing::debug!(delivered, "notification fanned out");

        Ok(stored)
    }

    /// Notifications visible to `user` strictly newer than `since`,
    /// oldest-first. Visibility covers direct and team-targeted audiences.
    ///
    /// # Errors
    ///
    /// Returns a store or directory error.
    #[tracing::instrument(skip(self))]
    pub async fn list_since(
        &self,
        user: UserId,
        since: Option<Timestamp>,
    ) -> Result<Vec<Notification>, SalesdeskError> {
        let teams = self.directory.teams_of(user).await?;
        self.store.find_since(user, teams, since).await
    }

    /// Register a long-poll wait on the user's personal channel.
    ///
    /// The requested timeout is clamped to the configured maximum.
    ///
    /// # Errors
    ///
    /// Returns [`SalesdeskError::Validation`] for a zero timeout.
    pub fn register_waiter(
        &self,
        user: UserId,
        timeout: Duration,
    ) -> Result<WaitGuard, SalesdeskError> {
        if timeout.is_zero() {
            return Err(ValidationError::ZeroTimeout.into());
        }
        let timeout = timeout.min(self.settings.max_wait);
        Ok(self.hub.register(Channel::User(user), timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::WaitOutcome;
    use salesdesk_domain::envelope::EnvelopePayload;
    use salesdesk_domain::id::TeamId;
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryNotificationStore {
        rows: Mutex<Vec<Notification>>,
    }

    impl NotificationStore for InMemoryNotificationStore {
        fn save(
            &self,
            notification: Notification,
        ) -> impl Future<Output = Result<Notification, SalesdeskError>> + Send {
            let mut rows = self.rows.lock().unwrap();
            rows.push(notification.clone());
            async { Ok(notification) }
        }

        fn find_since(
            &self,
            user: UserId,
            teams: Vec<TeamId>,
            since: Option<Timestamp>,
        ) -> impl Future<Output = Result<Vec<Notification>, SalesdeskError>> + Send {
            let rows = self.rows.lock().unwrap();
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

    #[derive(Default)]
    struct InMemoryDirectory {
        teams: Mutex<HashMap<TeamId, Vec<UserId>>>,
    }

    impl InMemoryDirectory {
        fn with_team(team: TeamId, members: Vec<UserId>) -> Self {
            let directory = Self::default();
            directory.teams.lock().unwrap().insert(team, members);
            directory
        }
    }

    impl TeamDirectory for InMemoryDirectory {
        fn members_of(
            &self,
            team: TeamId,
        ) -> impl Future<Output = Result<Vec<UserId>, SalesdeskError>> + Send {
            let teams = self.teams.lock().unwrap();
            let members = teams.get(&team).cloned().unwrap_or_default();
            async { Ok(members) }
        }

        fn teams_of(
            &self,
            user: UserId,
        ) -> impl Future<Output = Result<Vec<TeamId>, SalesdeskError>> + Send {
            let teams = self.teams.lock().unwrap();
            let result: Vec<TeamId> = teams
                .iter()
                .filter(|(_, members)| members.contains(&user))
                .map(|(team, _)| *team)
                .collect();
            async { Ok(result) }
        }

        fn is_member(
            &self,
            user: UserId,
            team: TeamId,
        ) -> impl Future<Output = Result<bool, SalesdeskError>> + Send {
            let teams = self.teams.lock().unwrap();
            let result = teams.get(&team).is_some_and(|m| m.contains(&user));
            async move { Ok(result) }
        }
    }

    fn service(
        directory: InMemoryDirectory,
    ) -> (
        NotificationService<InMemoryNotificationStore, InMemoryDirectory>,
        Arc<EventHub>,
    ) {
        let hub = Arc::new(EventHub::new());
        let svc = NotificationService::new(
            InMemoryNotificationStore::default(),
            directory,
            Arc::clone(&hub),
            HubSettings::default(),
        );
        (svc, hub)
    }

    #[tokio::test]
    async fn should_publish_user_notification_to_user_channel() {
        let (svc, hub) = service(InMemoryDirectory::default());
        let user = UserId::new();

        let guard = hub.register(Channel::User(user), Duration::from_secs(5));
        let stored = svc
            .create(Notification::new(Audience::User(user), "t", "body"))
            .await
            .unwrap();

        let WaitOutcome::Delivered(batch) = guard.wait().await else {
            panic!("expected delivery");
        };
        assert_eq!(batch.len(), 1);
        assert_eq!(
            batch[0].payload,
            EnvelopePayload::Notification(stored)
        );
    }

    #[tokio::test]
    async fn should_fan_out_team_notification_to_each_member_channel() {
        let team = TeamId::new();
        let alice = UserId::new();
        let bob = UserId::new();
        let (svc, hub) = service(InMemoryDirectory::with_team(team, vec![alice, bob]));

        let wait_alice = hub.register(Channel::User(alice), Duration::from_secs(5));
        let wait_bob = hub.register(Channel::User(bob), Duration::from_secs(5));

        svc.create(Notification::new(Audience::Team(team), "t", "body"))
            .await
            .unwrap();

        assert!(matches!(wait_alice.wait().await, WaitOutcome::Delivered(_)));
        assert!(matches!(wait_bob.wait().await, WaitOutcome::Delivered(_)));
    }

    #[tokio::test]
    async fn should_reject_empty_body() {
        let (svc, _hub) = service(InMemoryDirectory::default());
        let result = svc
            .create(Notification::new(Audience::User(UserId::new()), "t", "  "))
            .await;
        assert!(matches!(
            result,
            Err(SalesdeskError::Validation(ValidationError::EmptyBody))
        ));
    }

    #[tokio::test]
    async fn should_list_team_notifications_for_members_only() {
        let team = TeamId::new();
        let member = UserId::new();
        let outsider = UserId::new();
        let (svc, _hub) = service(InMemoryDirectory::with_team(team, vec![member]));

        svc.create(Notification::new(Audience::Team(team), "t", "body"))
            .await
            .unwrap();

        assert_eq!(svc.list_since(member, None).await.unwrap().len(), 1);
        assert!(svc.list_since(outsider, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_return_only_strictly_newer_notifications() {
        let user = UserId::new();
        let (svc, _hub) = service(InMemoryDirectory::default());

        let first = svc
            .create(Notification::new(Audience::User(user), "t", "body"))
            .await
            .unwrap();

        let listed = svc.list_since(user, Some(first.created_at)).await.unwrap();
        assert!(listed.is_empty());

        let listed = svc
            .list_since(user, Some(first.created_at - chrono::Duration::seconds(1)))
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn should_clamp_waiter_timeout_to_configured_maximum() {
        let (svc, hub) = service(InMemoryDirectory::default());
        let user = UserId::new();

        let guard = svc
            .register_waiter(user, Duration::from_secs(600))
            .unwrap();
        assert_eq!(hub.pending(Channel::User(user)), 1);
        drop(guard);

        let result = svc.register_waiter(user, Duration::ZERO);
        assert!(matches!(
            result,
            Err(SalesdeskError::Validation(ValidationError::ZeroTimeout))
        ));
    }
}
