//! Query signatures — canonical cache keys for derived reads.
//!
//! A cache key is a pipe-delimited string built from every filter and
//! pagination input. Absent optional filters become the literal `*`;
//! list-valued filters are sorted lexicographically before joining, so two
//! queries with the same filter set always produce the same key regardless
//! of input ordering.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::change::DomainKind;
use crate::time::Timestamp;

/// Placeholder for absent optional filters.
const WILDCARD: &str = "*";

/// Parameters of a yearly statistics read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsQuery {
    /// Calendar year the statistics cover.
    pub year: i32,
}

impl StatisticsQuery {
    /// Canonical cache key, e.g. `STATS|2024`.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("STATS|{}", self.year)
    }
}

/// Parameters of a document-history search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySearchQuery {
    /// Restrict to one record family.
    pub kind: Option<DomainKind>,
    /// Restrict to one agent by agent number.
    pub agent: Option<u64>,
    /// Restrict to these audit actions (any order; canonicalized on keying).
    pub actions: Vec<String>,
    /// Lower bound (inclusive) on action time.
    pub from: Option<Timestamp>,
    /// Upper bound (exclusive) on action time.
    pub to: Option<Timestamp>,
    /// Free-text filter.
    pub text: Option<String>,
    /// Zero-based page index.
    pub page: u32,
    /// Page size.
    pub page_size: u32,
}

impl HistorySearchQuery {
    /// Canonical cache key.
    ///
    /// Field order: kind, agent, actions, from, to, text, page, page size.
    /// Example: `INVOICE|42|CREATED,UPDATED|2024-01-01T10:15:30Z|2024-02-01T10:15:30Z|search|2|5`.
    #[must_use]
    pub fn cache_key(&self) -> String {
        let kind = self
            .kind
            .map_or_else(|| WILDCARD.to_string(), |k| k.to_string());
        let agent = self
            .agent
            .map_or_else(|| WILDCARD.to_string(), |a| a.to_string());
        let actions = if self.actions.is_empty() {
            WILDCARD.to_string()
        } else {
            let mut sorted = self.actions.clone();
            sorted.sort();
            sorted.join(",")
        };
        let from = format_bound(self.from);
        let to = format_bound(self.to);
        let text = self.text.as_deref().unwrap_or(WILDCARD);

        format!(
            "{kind}|{agent}|{actions}|{from}|{to}|{text}|{}|{}",
            self.page, self.page_size
        )
    }
}

/// Derived yearly statistics, as computed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsReport {
    /// Calendar year covered.
    pub year: i32,
    /// Total invoiced revenue in cents.
    pub revenue_cents: i64,
    /// Number of invoices issued.
    pub invoices_issued: u32,
    /// Number of contracts signed.
    pub contracts_signed: u32,
}

/// One page of a document-history search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPage {
    /// Entries of this page, oldest-first.
    pub entries: Vec<crate::command::AuditEntry>,
    /// Zero-based page index.
    pub page: u32,
    /// Total matching entries across all pages.
    pub total: u64,
}

fn format_bound(bound: Option<Timestamp>) -> String {
    bound.map_or_else(
        || WILDCARD.to_string(),
        |ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}
