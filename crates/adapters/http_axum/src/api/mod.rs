//! JSON API route definitions.

use axum::Router;
use axum::routing::get;

use salesdesk_app::ports::{ChatStore, NotificationStore, TeamDirectory};

use crate::state::AppState;

pub mod chat;
pub mod notifications;

/// Default long-poll duration when the client does not specify one.
pub const DEFAULT_WAIT_SECS: u64 = 30;

/// API routes, nested under `/api` by the router.
pub fn routes<NS, CS, D>() -> Router<AppState<NS, CS, D>>
where
    NS: NotificationStore + Send + Sync + 'static,
    CS: ChatStore + Send + Sync + 'static,
    D: TeamDirectory + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/notifications",
            get(notifications::list).post(notifications::create),
        )
        .route("/notifications/wait", get(notifications::wait))
        .route(
            "/conversations/{id}/messages",
            get(chat::list).post(chat::post),
        )
        .route("/conversations/{id}/wait", get(chat::wait))
}
