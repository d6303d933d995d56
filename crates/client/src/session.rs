//! Client session state.
//!
//! The pipeline never re-authenticates on its own: a `SessionExpired`
//! response invalidates this flag and the surrounding application decides
//! when to log in again.

use std::sync::atomic::{AtomicBool, Ordering};

/// Shared authentication flag for one client session.
#[derive(Debug)]
pub struct Session {
    authenticated: AtomicBool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session in the authenticated state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            authenticated: AtomicBool::new(true),
        }
    }

    /// Mark the session as no longer valid.
    pub fn invalidate(&self) {
        self.authenticated.store(false, Ordering::SeqCst);
    }

    /// Whether the session is still considered valid.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_start_authenticated_and_invalidate_once() {
        let session = Session::new();
        assert!(session.is_authenticated());
        session.invalidate();
        assert!(!session.is_authenticated());
    }
}
