//! JSON handlers for chat: message listing, posting, and long-poll wait.

use std::time::Duration;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use salesdesk_app::hub::WaitOutcome;
use salesdesk_app::ports::{ChatStore, NotificationStore, TeamDirectory};
use salesdesk_domain::chat::ChatMessage;
use salesdesk_domain::envelope::Envelope;
use salesdesk_domain::id::{ConversationId, UserId};
use salesdesk_domain::time::Timestamp;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the message list endpoint.
#[derive(Deserialize)]
pub struct ListParams {
    /// Subject reading the conversation (must be a team member).
    pub user_id: UserId,
    /// Only messages strictly newer than this instant; absent means all.
    pub since: Option<Timestamp>,
}

/// Query parameters for the wait endpoint.
#[derive(Deserialize)]
pub struct WaitParams {
    /// Subject registering the wait (must be a team member).
    pub user_id: UserId,
    /// Requested wait duration; clamped server-side.
    pub timeout_secs: Option<u64>,
}

/// Request body for posting a message.
#[derive(Deserialize)]
pub struct PostMessageRequest {
    /// Author of the message.
    pub sender_id: UserId,
    /// Message text.
    pub body: String,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<ChatMessage>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the post endpoint.
pub enum PostResponse {
    Created(Json<ChatMessage>),
}

impl IntoResponse for PostResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the wait endpoint.
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

/// `GET /api/conversations/{id}/messages?user_id=…&since=…`
pub async fn list<NS, CS, D>(
    State(state): State<AppState<NS, CS, D>>,
    Path(id): Path<ConversationId>,
    Query(params): Query<ListParams>,
) -> Result<ListResponse, ApiError>
where
    NS: NotificationStore + Send + Sync + 'static,
    CS: ChatStore + Send + Sync + 'static,
    D: TeamDirectory + Send + Sync + 'static,
{
    let messages = match params.since {
        Some(since) => {
            state
                .chat_service
                .list_since(params.user_id, id, Some(since))
                .await?
        }
        None => state.chat_service.list_all(params.user_id, id).await?,
    };
    Ok(ListResponse::Ok(Json(messages)))
}

/// `POST /api/conversations/{id}/messages`
pub async fn post<NS, CS, D>(
    State(state): State<AppState<NS, CS, D>>,
    Path(id): Path<ConversationId>,
    Json(request): Json<PostMessageRequest>,
) -> Result<PostResponse, ApiError>
where
    NS: NotificationStore + Send + Sync + 'static,
    CS: ChatStore + Send + Sync + 'static,
    D: TeamDirectory + Send + Sync + 'static,
{
    let stored = state
        .chat_service
        .post_message(request.sender_id, id, request.body)
        .await?;
    Ok(PostResponse::Created(Json(stored)))
}

/// `GET /api/conversations/{id}/wait?user_id=…&timeout_secs=…`
pub async fn wait<NS, CS, D>(
    State(state): State<AppState<NS, CS, D>>,
    Path(id): Path<ConversationId>,
    Query(params): Query<WaitParams>,
) -> Result<WaitResponse, ApiError>
where
    NS: NotificationStore + Send + Sync + 'static,
    CS: ChatStore + Send + Sync + 'static,
    D: TeamDirectory + Send + Sync + 'static,
{
    let timeout = Duration::from_secs(params.timeout_secs.unwrap_or(super::DEFAULT_WAIT_SECS));
    let guard = state
        .chat_service
        .register_waiter(params.user_id, id, timeout)
        .await?;

    let batch = match guard.wait().await {
        WaitOutcome::Delivered(batch) => batch,
        WaitOutcome::Empty => vec![],
    };
    Ok(WaitResponse::Ok(Json(batch)))
}
