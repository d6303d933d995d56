//! Commands — the closed set of mutating operations and their records.
//!
//! A command captures the intent of one backend mutation. The executor
//! matches on the variant to invoke the corresponding backend call, so the
//! set of operations stays closed and exhaustively checkable.

use serde::{Deserialize, Serialize};

use crate::change::DomainKind;
use crate::id::RecordId;
use crate::time::Timestamp;

/// One mutating operation, discriminated by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Create a new business record.
    Create {
        /// Record family.
        kind: DomainKind,
        /// Record fields as submitted.
        payload: serde_json::Value,
    },
    /// Update an existing record.
    Update {
        /// Record family.
        kind: DomainKind,
        /// Target record.
        id: RecordId,
        /// Updated fields.
        payload: serde_json::Value,
    },
    /// Delete a record.
    Delete {
        /// Record family.
        kind: DomainKind,
        /// Target record.
        id: RecordId,
    },
    /// Register a payment against an invoice.
    RegisterPayment {
        /// Invoice being paid.
        invoice_id: RecordId,
        /// Amount in cents.
        amount_cents: i64,
        /// Value date of the payment.
        paid_at: Timestamp,
    },
}

impl Command {
    /// The record family this command mutates.
    #[must_use]
    pub fn kind(&self) -> DomainKind {
        match self {
            Self::Create { kind, .. } | Self::Update { kind, .. } | Self::Delete { kind, .. } => {
                *kind
            }
            Self::RegisterPayment { .. } => DomainKind::Invoice,
        }
    }
}

/// One entry of the audit trail the backend attaches to document actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Action name as recorded server-side, e.g. `"CREATED"`.
    pub action: String,
    /// Acting user, as reported by the backend.
    pub actor: String,
    /// Server-side time of the action.
    pub at: Timestamp,
}

/// Successful result of a command: the returned value plus any audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    /// Value returned by the backend call.
    pub value: serde_json::Value,
    /// Audit entries attached by the backend, oldest-first. Empty for
    /// operations without a document history.
    pub audit: Vec<AuditEntry>,
}

/// One logged, successfully executed command. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// The command as issued.
    pub command: Command,
    /// What the backend returned.
    pub outcome: CommandOutcome,
    /// Client-local execution time.
    pub executed_at: Timestamp,
}

impl CommandRecord {
    /// Build a record for a command that just completed.
    #[must_use]
    pub fn new(command: Command, outcome: CommandOutcome) -> Self {
        Self {
            command,
            outcome,
            executed_at: crate::time::now(),
        }
    }
}
