//! End-to-end smoke tests for the full salesdeskd stack.
//!
//! Most tests spin up the complete application (in-memory stores, real
//! services, real axum router) and exercise the HTTP layer via
//! `tower::ServiceExt::oneshot` without binding a TCP port. The final test
//! binds a real listener and drives the client-side poll loop against it.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use salesdesk_adapter_http_axum::router;
use salesdesk_adapter_http_axum::state::AppState;
use salesdesk_adapter_memory::{MemoryChatStore, MemoryNotificationStore, MemoryTeamDirectory};
use salesdesk_app::hub::{EventHub, HubSettings};
use salesdesk_app::services::chat_service::ChatService;
use salesdesk_app::services::notification_service::NotificationService;
use salesdesk_client::dispatcher::{EnvelopeDispatcher, Observer};
use salesdesk_client::http::HttpPollTransport;
use salesdesk_client::poller::{Poller, PollerExit};
use salesdesk_client::session::Session;
use salesdesk_domain::envelope::Envelope;
use salesdesk_domain::error::SalesdeskError;
use salesdesk_domain::id::{TeamId, UserId};
use salesdesk_domain::notification::{Audience, Notification};

struct Stack {
    app: axum::Router,
    state: AppState<MemoryNotificationStore, MemoryChatStore, Arc<MemoryTeamDirectory>>,
    team: TeamId,
    member: UserId,
}

/// Build a fully-wired router backed by in-memory stores, with one team of
/// one member registered in the directory.
fn stack() -> Stack {
    let hub = Arc::new(EventHub::new());
    let team = TeamId::new();
    let member = UserId::new();

    let directory = Arc::new(MemoryTeamDirectory::new());
    directory.set_team(team, vec![member]);

    let state = AppState::new(
        NotificationService::new(
            MemoryNotificationStore::new(),
            Arc::clone(&directory),
            Arc::clone(&hub),
            HubSettings::default(),
        ),
        ChatService::new(MemoryChatStore::new(), directory, hub, HubSettings::default()),
    );

    Stack {
        app: router::build(state.clone()),
        state,
        team,
        member,
    }
}

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let resp = stack()
        .app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn should_deliver_team_notification_to_member_via_list() {
    let stack = stack();

    let payload = serde_json::json!({
        "audience": {"scope": "team", "id": stack.team},
        "title": "Contract signed",
        "body": "ACME renewed for 2027",
    });
    let resp = stack
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
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = stack
        .app
        .oneshot(
            Request::builder()
                .uri(format!("/api/notifications?user_id={}", stack.member))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let listed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["title"], "Contract signed");
}

#[tokio::test]
async fn should_not_deliver_team_notification_to_outsider() {
    let stack = stack();

    let payload = serde_json::json!({
        "audience": {"scope": "team", "id": stack.team},
        "title": "internal",
        "body": "members only",
    });
    stack
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

    let resp = stack
        .app
        .oneshot(
            Request::builder()
                .uri(format!("/api/notifications?user_id={}", UserId::new()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let listed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(listed.as_array().unwrap().is_empty());
}

struct Collector {
    seen: AtomicUsize,
}

impl Observer<Envelope> for Collector {
    fn notify(&self, _event: &Envelope) -> Result<(), SalesdeskError> {
        self.seen.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Full pipeline over a real TCP socket: server publish resolves the
/// client's in-flight long poll, and the envelope reaches a local observer.
#[tokio::test]
async fn should_push_server_side_create_to_client_observer() {
    let stack = stack();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, stack.app).await.unwrap();
    });

    let dispatcher = Arc::new(EnvelopeDispatcher::new());
    let collector = Arc::new(Collector {
        seen: AtomicUsize::new(0),
    });
    dispatcher.subscribe(collector.clone());

    let transport = HttpPollTransport::new(format!("http://{addr}"), stack.member).unwrap();
    let (stop_tx, stop_rx) = tokio::sync::watch::channel(false);
    let poller = Poller::new(
        transport,
        dispatcher,
        Arc::new(Session::new()),
        Duration::from_secs(1),
        stop_rx,
    );
    let poll_loop = tokio::spawn(poller.run());

    // Let the first wait request reach the hub before publishing.
    tokio::time::sleep(Duration::from_millis(200)).await;
    stack
        .state
        .notification_service
        .create(Notification::new(
            Audience::Team(stack.team),
            "Invoice paid",
            "INV-2042 settled in full",
        ))
        .await
        .unwrap();

    let mut waited = Duration::ZERO;
    while collector.seen.load(Ordering::SeqCst) == 0 && waited < Duration::from_secs(5) {
        tokio::time::sleep(Duration::from_millis(20)).await;
        waited += Duration::from_millis(20);
    }
    assert_eq!(collector.seen.load(Ordering::SeqCst), 1);

    stop_tx.send(true).unwrap();
    let exit = tokio::time::timeout(Duration::from_secs(10), poll_loop)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(exit, PollerExit::Stopped);

    server.abort();
}

/// Reconciliation path: after a gap the client recovers missed
/// notifications through the list endpoint.
#[tokio::test]
async fn should_recover_missed_notifications_via_list_since() {
    let stack = stack();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, stack.app).await.unwrap();
    });

    // Published while no poll is in flight.
    stack
        .state
        .notification_service
        .create(Notification::new(
            Audience::User(stack.member),
            "while you were away",
            "catch up",
        ))
        .await
        .unwrap();

    let transport = HttpPollTransport::new(format!("http://{addr}"), stack.member).unwrap();
    let recovered = transport.list_since(None).await.unwrap();
    assert_eq!(recovered.len(), 1);
    assert_eq!(recovered[0].title, "while you were away");

    server.abort();
}
