//! # salesdesk-client
//!
//! Client-side half of the change-notification pipeline.
//!
//! ## Responsibilities
//! - [`poller`]: the long-poll loop against the server wait endpoint
//! - [`dispatcher`]: in-process observer registry for UI-facing consumers
//! - [`commands`]: mutating operations as executable command values with a
//!   bounded execution history
//! - [`cache`]: derived-read caching with command-driven invalidation
//! - [`http`]: the reqwest transport implementing the wire contract
//!
//! The poll channel is a low-latency nudge, never a durable log: after any
//! gap (reconnect, missed publish) callers reconcile through the server's
//! `list_since` query.

pub mod cache;
pub mod commands;
pub mod dispatcher;
pub mod history;
pub mod http;
pub mod poller;
pub mod session;
