//! JSON handlers for notifications: list-since, create, and long-poll wait.

use std::time::Duration;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use salesdesk_app::hub::WaitOutcome;
use salesdesk_app::ports::{ChatStore, NotificationStore, TeamDirectory};
use salesdesk_domain::envelope::Envelope;
use salesdesk_domain::id::UserId;
use salesdesk_domain::notification::{Audience, Notification};
use salesdesk_domain::time::Timestamp;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the list endpoint.
#[derive(Deserialize)]
pub struct ListParams {
    /// Subject whose visible notifications are listed.
    pub user_id: UserId,
    /// Only notifications strictly newer than this instant.
    pub since: Option<Timestamp>,
}

/// Query parameters for the wait endpoint.
#[derive(Deserialize)]
pub struct WaitParams {
    /// Subject registering the wait.
    pub user_id: UserId,
    /// Requested wait duration; clamped server-side.
    pub timeout_secs: Option<u64>,
}

/// Request body for creating a notification.
#[derive(Deserialize)]
pub struct CreateNotificationRequest {
    /// Delivery audience.
    pub audience: Audience,
    /// Short summary line.
    pub title: String,
    /// Full message body.
    pub body: String,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Notification>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Notification>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the wait endpoint. A timeout is `Ok` with an
/// empty batch — never an error.
pub enum WaitResponse {
    Ok(Json<Vec<Envelope>>),
}

impl IntoResponse for WaitResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/notifications?user_id=…&since=…`
pub async fn list<NS, CS, D>(
    State(state): State<AppState<NS, CS, D>>,
    Query(params): Query<ListParams>,
) -> Result<ListResponse, ApiError>
where
    NS: NotificationStore + Send + Sync + 'static,
    CS: ChatStore + Send + Sync + 'static,
    D: TeamDirectory + Send + Sync + 'static,
{
    let notifications = state
        .notification_service
        .list_since(params.user_id, params.since)
        .await?;
    Ok(ListResponse::Ok(Json(notifications)))
}

/// `POST /api/notifications`
pub async fn create<NS, CS, D>(
    State(state): State<AppState<NS, CS, D>>,
    Json(request): Json<CreateNotificationRequest>,
) -> Result<CreateResponse, ApiError>
where
    NS: NotificationStore + Send + Sync + 'static,
    CS: ChatStore + Send + Sync + 'static,
    D: TeamDirectory + Send + Sync + 'static,
{
    let stored = state
        .notification_service
        .create(Notification::new(
            request.audience,
            request.title,
            request.body,
        ))
        .await?;
    Ok(CreateResponse::Created(Json(stored)))
}

/// `GET /api/notifications/wait?user_id=…&timeout_secs=…`
///
/// Held open until an envelope arrives on the user's channel or the timeout
/// elapses; both outcomes are HTTP 200.
pub async fn wait<NS, CS, D>(
    State(state): State<AppState<NS, CS, D>>,
    Query(params): Query<WaitParams>,
) -> Result<WaitResponse, ApiError>
where
    NS: NotificationStore + Send + Sync + 'static,
    CS: ChatStore + Send + Sync + 'static,
    D: TeamDirectory + Send + Sync + 'static,
{
    let timeout = Duration::from_secs(params.timeout_secs.unwrap_or(super::DEFAULT_WAIT_SECS));
    let guard = state
        .notification_service
        .register_waiter(params.user_id, timeout)?;

    let batch = match guard.wait().await {
        WaitOutcome::Delivered(batch) => batch,
        WaitOutcome::Empty => vec![],
    };
    Ok(WaitResponse::Ok(Json(batch)))
}
