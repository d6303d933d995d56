//! Change events — local notifications that a domain type was mutated.
//!
//! These drive cache invalidation and UI refresh on the client; they never
//! travel over the network.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// The business record families a command can mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainKind {
    /// Sales agent master data.
    Agent,
    /// Customer master data.
    Customer,
    /// Sales contract.
    Contract,
    /// Invoice, including payment registration.
    Invoice,
    /// Article / price-list entry.
    Article,
}

impl fmt::Display for DomainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Agent => "AGENT",
            Self::Customer => "CUSTOMER",
            Self::Contract => "CONTRACT",
            Self::Invoice => "INVOICE",
            Self::Article => "ARTICLE",
        };
        f.write_str(name)
    }
}

/// A local data-change event published after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Which record family changed.
    pub kind: DomainKind,
    /// When the mutation completed locally.
    pub at: Timestamp,
}

impl ChangeEvent {
    /// Build a change event stamped with the current time.
    #[must_use]
    pub fn new(kind: DomainKind) -> Self {
        Self {
            kind,
            at: crate::time::now(),
        }
    }
}
