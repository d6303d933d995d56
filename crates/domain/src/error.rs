//! Common error types used across the workspace.
//!
//! A long-poll timeout is deliberately **not** part of this taxonomy: an
//! elapsed wait is a normal outcome (an empty batch), never an error.

use serde::{Deserialize, Serialize};

/// Workspace-wide error type.
///
/// Each layer constructs the typed sub-error it owns and converts via
/// `#[from]`; no `String` variants.
#[derive(Debug, thiserror::Error)]
pub enum SalesdeskError {
    /// Network or IO failure talking to a collaborator.
    #[error("transport failure")]
    Transport(#[from] TransportError),

    /// The server rejected the session mid-flight; the caller must
    /// re-authenticate. Never retried automatically.
    #[error("session expired")]
    SessionExpired,

    /// The subject is not allowed to perform the operation.
    #[error("access denied")]
    AccessDenied(#[from] AccessDeniedError),

    /// The target entity does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// Malformed command or request input.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The persistent store collaborator failed.
    #[error("store error")]
    Store(#[from] StoreError),
}

/// Network-level failure detail.
#[derive(Debug, thiserror::Error)]
#[error("{context}: {message}")]
pub struct TransportError {
    /// What was being attempted.
    pub context: &'static str,
    /// Underlying failure description.
    pub message: String,
}

/// Authorization rejection detail.
#[derive(Debug, thiserror::Error)]
#[error("{subject} may not {action}")]
pub struct AccessDeniedError {
    /// Who was rejected.
    pub subject: String,
    /// What they attempted.
    pub action: &'static str,
}

/// Missing-entity detail.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Entity kind, e.g. `"Conversation"`.
    pub entity: &'static str,
    /// Identifier that failed to resolve.
    pub id: String,
}

/// Input validation failures.
#[derive(Debug, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum ValidationError {
    /// A message or notification body was empty.
    #[error("body must not be empty")]
    EmptyBody,
    /// A requested wait duration was zero.
    #[error("timeout must be non-zero")]
    ZeroTimeout,
    /// A paginated query asked for a zero-sized page.
    #[error("page size must be non-zero")]
    ZeroPageSize,
}

/// Failure reported by the persistent store collaborator.
#[derive(Debug, thiserror::Error)]
#[error("store operation failed: {0}")]
pub struct StoreError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_sub_errors_via_from() {
        let err: SalesdeskError = NotFoundError {
            entity: "Conversation",
            id: "abc".to_string(),
        }
        .into();
        assert!(matches!(err, SalesdeskError::NotFound(_)));

        let err: SalesdeskError = ValidationError::EmptyBody.into();
        assert!(matches!(err, SalesdeskError::Validation(_)));
    }

    #[test]
    fn should_render_not_found_with_entity_and_id() {
        let err = NotFoundError {
            entity: "Conversation",
            id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Conversation abc not found");
    }
}
