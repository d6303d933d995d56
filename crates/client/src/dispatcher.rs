//! In-process observer registry.
//!
//! Independent of the network hub: this is how the client fans out local
//! events (incoming envelopes, domain-change events) to UI-facing consumers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use salesdesk_domain::change::ChangeEvent;
use salesdesk_domain::envelope::Envelope;
use salesdesk_domain::error::SalesdeskError;

/// Callback interface with a single method, implemented by consumers.
pub trait Observer<E>: Send + Sync {
    /// Handle one delivered event. An error is logged by the dispatcher and
    /// never stops delivery to the remaining observers.
    fn notify(&self, event: &E) -> Result<(), SalesdeskError>;
}

/// Token returned by [`Dispatcher::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Concurrency-safe publish/subscribe registry.
///
/// A publish takes a snapshot of the current observers before delivering:
/// observers added during a delivery are not retroactively notified for it,
/// and an unsubscribed observer never sees *later* deliveries.
pub struct Dispatcher<E> {
    next_id: AtomicU64,
    observers: Mutex<Vec<(SubscriptionId, Arc<dyn Observer<E>>)>>,
}

/// Dispatcher for local domain-change events.
pub type ChangeDispatcher = Dispatcher<ChangeEvent>;

/// Dispatcher for envelopes received by the poller.
pub type EnvelopeDispatcher = Dispatcher<Envelope>;

impl<E> Default for Dispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Dispatcher<E> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Register an observer; safe to call while a publish is in progress.
    pub fn subscribe(&self, observer: Arc<dyn Observer<E>>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut observers = self.observers.lock().expect("dispatcher poisoned");
        observers.push((id, observer));
        id
    }

    /// Remove an observer. No-op for an unknown id.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut observers = self.observers.lock().expect("dispatcher poisoned");
        observers.retain(|(existing, _)| *existing != id);
    }

    /// Synchronously deliver `event` to every currently registered observer.
    ///
    /// One observer's failure does not prevent delivery to the rest.
    pub fn publish(&self, event: &E) {
        let snapshot: Vec<Arc<dyn Observer<E>>> = {
            let observers = self.observers.lock().expect("dispatcher poisoned");
            observers.iter().map(|(_, o)| Arc::clone(o)).collect()
        };

        for observer in snapshot {
            if let Err(err) = observer.notify(event) {
                tracing::warn!(%err, "observer failed to handle event");
            }
        }
    }

    /// Number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.lock().expect("dispatcher poisoned").len()
    }
}
