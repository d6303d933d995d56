//! Use-case services — producers of hub traffic.

pub mod chat_service;
pub mod notification_service;
