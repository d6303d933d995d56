//! Command layer: mutating backend calls as executable values.
//!
//! Each mutation is a [`Command`] value; the executor matches on the variant
//! to invoke the corresponding backend call, records the successful outcome
//! (including the backend's audit trail) in the [`HistoryStore`], and hands
//! the outcome back to the caller. Execution is not transactional with any
//! hub publish: the audit trail is returned synchronously by the backend
//! call itself, and the history store is client-local, distinct from the
//! server's document-history log.

use std::future::Future;
use std::sync::Arc;

use salesdesk_domain::change::DomainKind;
use salesdesk_domain::command::{Command, CommandOutcome, CommandRecord};
use salesdesk_domain::error::SalesdeskError;
use salesdesk_domain::id::RecordId;
use salesdesk_domain::query::{HistoryPage, HistorySearchQuery, StatisticsQuery, StatisticsReport};
use salesdesk_domain::time::Timestamp;

use crate::history::HistoryStore;
use crate::session::Session;

/// Backend RPC collaborator with one call per operation kind.
///
/// Every call returns either a success value or a typed error
/// (`NotFound`, `Validation`, `AccessDenied`, `SessionExpired`, …).
pub trait BackendApi {
    /// Create a business record.
    fn create(
        &self,
        kind: DomainKind,
        payload: serde_json::Value,
    ) -> impl Future<Output = Result<CommandOutcome, SalesdeskError>> + Send;

    /// Update a business record.
    fn update(
        &self,
        kind: DomainKind,
        id: RecordId,
        payload: serde_json::Value,
    ) -> impl Future<Output = Result<CommandOutcome, SalesdeskError>> + Send;

    /// Delete a business record.
    fn delete(
        &self,
        kind: DomainKind,
        id: RecordId,
    ) -> impl Future<Output = Result<CommandOutcome, SalesdeskError>> + Send;

    /// Register a payment against an invoice.
    fn register_payment(
        &self,
        invoice_id: RecordId,
        amount_cents: i64,
        paid_at: Timestamp,
    ) -> impl Future<Output = Result<CommandOutcome, SalesdeskError>> + Send;

    /// Compute yearly statistics.
    fn yearly_statistics(
        &self,
        query: StatisticsQuery,
    ) -> impl Future<Output = Result<StatisticsReport, SalesdeskError>> + Send;

    /// Search the server-side document history.
    fn search_history(
        &self,
        query: HistorySearchQuery,
    ) -> impl Future<Output = Result<HistoryPage, SalesdeskError>> + Send;
}

impl<T: BackendApi + Send + Sync> BackendApi for Arc<T> {
    fn create(
        &self,
        kind: DomainKind,
        payload: serde_json::Value,
    ) -> impl Future<Output = Result<CommandOutcome, SalesdeskError>> + Send {
        (**self).create(kind, payload)
    }

    fn update(
        &self,
        kind: DomainKind,
        id: RecordId,
        payload: serde_json::Value,
    ) -> impl Future<Output = Result<CommandOutcome, SalesdeskError>> + Send {
        (**self).update(kind, id, payload)
    }

    fn delete(
        &self,
        kind: DomainKind,
        id: RecordId,
    ) -> impl Future<Output = Result<CommandOutcome, SalesdeskError>> + Send {
        (**self).delete(kind, id)
    }

    fn register_payment(
        &self,
        invoice_id: RecordId,
        amount_cents: i64,
        paid_at: Timestamp,
    ) -> impl Future<Output = Result<CommandOutcome, SalesdeskError>> + Send {
        (**self).register_payment(invoice_id, amount_cents, paid_at)
    }

    fn yearly_statistics(
        &self,
        query: StatisticsQuery,
    ) -> impl Future<Output = Result<StatisticsReport, SalesdeskError>> + Send {
        (**self).yearly_statistics(query)
    }

    fn search_history(
        &self,
        query: HistorySearchQuery,
    ) -> impl Future<Output = Result<HistoryPage, SalesdeskError>> + Send {
        (**self).search_history(query)
    }
}

/// Executes commands against a backend and records successful outcomes.
pub struct CommandExecutor<B> {
    backend: B,
    history: Arc<HistoryStore>,
    session: Arc<Session>,
}

impl<B: BackendApi> CommandExecutor<B> {
    /// Create a new executor.
    pub fn new(backend: B, history: Arc<HistoryStore>, session: Arc<Session>) -> Self {
        Self {
            backend,
            history,
            session,
        }
    }

    /// The backend collaborator, for read paths.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The execution history shared with this executor.
    #[must_use]
    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    /// Run one command against the backend.
    ///
    /// A successful outcome is appended to the history store; a failure is
    /// returned as-is and leaves no record. `SessionExpired` additionally
    /// invalidates the shared [`Session`].
    ///
    /// # Errors
    ///
    /// Propagates the backend's typed error.
    #[tracing::instrument(skip(self, command), fields(kind = %command.kind()))]
    pub async fn execute(&self, command: Command) -> Result<CommandOutcome, SalesdeskError> {
        let result = match command.clone() {
            Command::Create { kind, payload } => self.backend.create(kind, payload).await,
            Command::Update { kind, id, payload } => self.backend.update(kind, id, payload).await,
            Command::Delete { kind, id } => self.backend.delete(kind, id).await,
            Command::RegisterPayment {
                invoice_id,
                amount_cents,
                paid_at,
            } => {
                self.backend
                    .register_payment(invoice_id, amount_cents, paid_at)
                    .await
            }
        };

        match result {
            Ok(outcome) => {
                self.history
                    .add_record(CommandRecord::new(command, outcome.clone()));
                Ok(outcome)
            }
            Err(err) => {
                if matches!(err, SalesdeskError::SessionExpired) {
                    tracing::warn!("backend rejected session, invalidating");
                    self.session.invalidate();
                }
                Err(err)
            }
        }
    }
}
