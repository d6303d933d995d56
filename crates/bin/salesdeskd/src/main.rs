//! # salesdeskd
//!
//! Composition root that wires the stores, the event hub, and the HTTP
//! adapter together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env vars)
//! - Construct store implementations (adapters)
//! - Construct application services, injecting stores via port traits
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the only crate that depends on all other crates. It is the
//! wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use salesdesk_adapter_http_axum::state::AppState;
use salesdesk_adapter_memory::{MemoryChatStore, MemoryNotificationStore, MemoryTeamDirectory};
use salesdesk_app::hub::{EventHub, HubSettings};
use salesdesk_app::services::chat_service::ChatService;
use salesdesk_app::services::notification_service::NotificationService;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let hub = Arc::new(EventHub::new());
    let settings = HubSettings {
        max_wait: Duration::from_secs(config.hub.max_wait_secs),
    };

    let directory = Arc::new(MemoryTeamDirectory::new());

    let notification_service = NotificationService::new(
        MemoryNotificationStore::new(),
        Arc::clone(&directory),
        Arc::clone(&hub),
        settings,
    );
    let chat_service = ChatService::new(MemoryChatStore::new(), directory, hub, settings);

    let state = AppState::new(notification_service, chat_service);
    let app = salesdesk_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "salesdeskd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(err) => tracing::error!(%err, "failed to listen for shutdown signal"),
    }
}
