//! # salesdesk-domain
//!
//! Pure domain model for the salesdesk change-notification pipeline.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error taxonomy, timestamps
//! - Define **Channels** (subscription scopes for long-poll delivery)
//! - Define **Envelopes** (transient event payloads: notifications, chat messages)
//! - Define **Commands** (the closed set of mutating operations) and
//!   **Command Records** (logged attempts with their audit trail)
//! - Define **Change Events** (local data-change notifications)
//! - Define **Query signatures** (canonical cache keys for derived reads)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` and `client` crates.

pub mod error;
pub mod id;
pub mod time;

pub mod change;
pub mod channel;
pub mod chat;
pub mod command;
pub mod envelope;
pub mod notification;
pub mod query;
