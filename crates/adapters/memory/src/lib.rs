//! # salesdesk-adapter-memory
//!
//! In-memory adapters for the `salesdesk-app` ports. Durable persistence of
//! business data lives outside this system; these adapters give the daemon
//! and the tests a complete, dependency-free store.

mod chat_store;
mod directory;
mod notification_store;

pub use chat_store::MemoryChatStore;
pub use directory::MemoryTeamDirectory;
pub use notification_store::MemoryNotificationStore;
