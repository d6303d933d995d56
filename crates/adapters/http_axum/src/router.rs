//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use salesdesk_app::ports::{ChatStore, NotificationStore, TeamDirectory};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests the JSON API under `/api` and includes a [`TraceLayer`] that logs
/// each HTTP request/response at the `DEBUG` level using the `tracing`
/// ecosystem.
pub fn build<NS, CS, D>(state: AppState<NS, CS, D>) -> Router
where
    NS: NotificationStore + Send + Sync + 'static,
    CS: ChatStore + Send + Sync + 'static,
    D: TeamDirectory + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use salesdesk_adapter_memory::{MemoryChatStore, MemoryNotificationStore, MemoryTeamDirectory};
    use salesdesk_app::hub::{EventHub, HubSettings};
    use salesdesk_app::ports::ChatStore as _;
    use salesdesk_app::services::chat_service::ChatService;
    use salesdesk_app::services::notification_service::NotificationService;
    use salesdesk_domain::chat::Conversation;
    use salesdesk_domain::envelope::Envelope;
    use salesdesk_domain::id::{ConversationId, TeamId, UserId};
    use salesdesk_domain::notification::Notification;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    struct Fixture {
        app: Router,
        state: AppState<MemoryNotificationStore, MemoryChatStore, Arc<MemoryTeamDirectory>>,
        team: TeamId,
        member: UserId,
        conversation: ConversationId,
    }

    async fn fixture() -> Fixture {
        let hub = Arc::new(EventHub::new());
        let team = TeamId::new();
        let member = UserId::new();

        let directory = Arc::new(MemoryTeamDirectory::new());
        directory.set_team(team, vec![member]);

        let chat_store = MemoryChatStore::new();
        let conversation = Conversation {
            id: ConversationId::new(),
            team_id: team,
            subject: "pipeline review".to_string(),
        };
        chat_store
            .save_conversation(conversation.clone())
            .await
            .unwrap();

        let state = AppState::new(
            NotificationService::new(
                MemoryNotificationStore::new(),
                Arc::clone(&directory),
                Arc::clone(&hub),
                HubSettings::default(),
            ),
            ChatService::new(
                chat_store,
                directory,
                hub,
                HubSettings::default(),
            ),
        );
        Fixture {
            app: build(state.clone()),
            state,
            team,
            member,
            conversation: conversation.id,
        }
    }

    async fn body_json(body: Body) -> serde_json::Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let fx = fixture().await;
        let response = fx
            .app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_create_and_list_notification() {
        let fx = fixture().await;

        let payload = serde_json::json!({
            "audience": {"scope": "team", "id": fx.team},
            "title": "New contract",
            "body": "ACME signed",
        });
        let response = fx
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/notifications")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = fx
            .app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/notifications?user_id={}", fx.member))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let listed = body_json(response.into_body()).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["title"], "New contract");
    }

    #[tokio::test]
    async fn should_return_empty_batch_when_wait_times_out() {
        let fx = fixture().await;
        let response = fx
            .app
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/api/notifications/wait?user_id={}&timeout_secs=1",
                        fx.member
                    ))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Timeout is a normal outcome: 200 with an empty batch.
        assert_eq!(response.status(), StatusCode::OK);
        let batch: Vec<Envelope> =
            serde_json::from_value(body_json(response.into_body()).await).unwrap();
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn should_resolve_wait_when_notification_created_mid_poll() {
        let fx = fixture().await;
        let service = Arc::clone(&fx.state.notification_service);
        let team = fx.team;

        let producer = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            service
                .create(Notification::new(
                    salesdesk_domain::notification::Audience::Team(team),
                    "ping",
                    "wake up",
                ))
                .await
                .unwrap();
        });

        let response = fx
            .app
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/api/notifications/wait?user_id={}&timeout_secs=5",
                        fx.member
                    ))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        producer.await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let batch: Vec<Envelope> =
            serde_json::from_value(body_json(response.into_body()).await).unwrap();
        assert_eq!(batch.len(), 1);
    }

    #[tokio::test]
    async fn should_reject_chat_post_from_outsider() {
        let fx = fixture().await;
        let payload = serde_json::json!({
            "sender_id": UserId::new(),
            "body": "let me in",
        });
        let response = fx
            .app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/conversations/{}/messages", fx.conversation))
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_conversation() {
        let fx = fixture().await;
        let response = fx
            .app
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/api/conversations/{}/messages?user_id={}",
                        ConversationId::new(),
                        fx.member
                    ))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_post_and_list_chat_messages() {
        let fx = fixture().await;
        let payload = serde_json::json!({
            "sender_id": fx.member,
            "body": "quarterly numbers are in",
        });
        let response = fx
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/conversations/{}/messages", fx.conversation))
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = fx
            .app
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/api/conversations/{}/messages?user_id={}",
                        fx.conversation, fx.member
                    ))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let listed = body_json(response.into_body()).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }
}
