//! # salesdesk-adapter-http-axum
//!
//! HTTP surface for the change-notification pipeline: `list_since` queries,
//! notification/message creation, and the long-poll wait endpoints. A wait
//! response is always HTTP 200 — a timeout yields an empty batch, never an
//! error.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
