//! # salesdesk-app
//!
//! Server-side application core for the change-notification pipeline.
//!
//! ## Responsibilities
//! - The in-memory [`hub::EventHub`]: long-poll registration and fan-out
//! - Use-case services for notifications and chat (validate, persist, publish)
//! - Port definitions (traits) that adapters implement
//!
//! ## Dependency rule
//! Depends only on `salesdesk-domain`. Adapters depend on this crate, never
//! the other way around.

pub mod hub;
pub mod ports;
pub mod services;
