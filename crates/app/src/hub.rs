//! In-memory publish/subscribe hub for long-poll delivery.
//!
//! The hub keeps one wait-set per [`Channel`]. A long-poll request registers
//! a single-fire slot and waits on it with a mandatory timeout; a publish
//! resolves *all* slots currently pending on the channel and removes them.
//! Nothing is buffered: publishing to a channel with no pending waits drops
//! the envelope (at-most-once, best-effort — missed events are recovered by
//! the producer's `list_since` query).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;

use salesdesk_domain::channel::Channel;
use salesdesk_domain::envelope::Envelope;

/// Tuning knobs shared by the services that hand out waits.
#[derive(Debug, Clone, Copy)]
pub struct HubSettings {
    /// Upper bound applied to every requested wait duration.
    pub max_wait: Duration,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            max_wait: Duration::from_secs(30),
        }
    }
}

/// One pending long-poll wait inside the registry.
struct WaitSlot {
    id: uuid::Uuid,
    tx: oneshot::Sender<Vec<Envelope>>,
}

/// Outcome of a completed wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome {
    /// At least one envelope arrived before the timeout, in publish order.
    Delivered(Vec<Envelope>),
    /// The timeout elapsed without a publish. Not an error.
    Empty,
}

/// In-memory publish/subscribe registry keyed by channel.
///
/// Construct one instance per process (or per test) and share it via
/// [`Arc`]; `register` and `publish` are safe to call concurrently without
/// external locking. Registration and resolution of a channel's wait-set
/// are atomic with respect to each other: the registry mutex is never held
/// across an await point.
pub struct EventHub {
    registry: Mutex<HashMap<Channel, Vec<WaitSlot>>>,
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHub {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(HashMap::new()),
        }
    }

    /// Register a pending wait on `channel`.
    ///
    /// Multiple concurrent waits on the same channel queue as independent
    /// slots; a publish resolves all of them. The returned guard deregisters
    /// itself when dropped, so an abandoned wait (client disconnect) never
    /// leaks a registry slot.
    #[must_use]
    pub fn register(self: &Arc<Self>, channel: Channel, timeout: Duration) -> WaitGuard {
        let (tx, rx) = oneshot::channel();
        let id = uuid::Uuid::new_v4();

        let mut registry = self.registry.lock().expect("hub registry poisoned");
        registry.entry(channel).or_default().push(WaitSlot { id, tx });
        drop(registry);

        tracing::debug!(%channel, wait_id = %id, "registered long-poll wait");

        WaitGuard {
            hub: Arc::clone(self),
            channel,
            id,
            rx: Some(rx),
            timeout,
        }
    }

    /// Resolve every pending wait on `channel` with `envelope`.
    ///
    /// Returns how many waits were completed. Zero pending waits means the
    /// envelope is dropped — never buffered, never retried.
    pub fn publish(&self, channel: Channel, envelope: &Envelope) -> usize {
        let slots = {
            let mut registry = self.registry.lock().expect("hub registry poisoned");
            registry.remove(&channel).unwrap_or_default()
        };

        let mut delivered = 0;
        for slot in slots {
            // A send failure means the receiver was dropped in the window
            // between our removal and its cancellation — benign race.
            if slot.tx.send(vec![envelope.clone()]).is_ok() {
                delivered += 1;
            }
        }

        tracing::debug!(%channel, delivered, "published envelope");
        delivered
    }

    /// Number of waits currently pending on `channel`.
    #[must_use]
    pub fn pending(&self, channel: Channel) -> usize {
        let registry = self.registry.lock().expect("hub registry poisoned");
        registry.get(&channel).map_or(0, Vec::len)
    }

    /// Remove one slot by id. No-op if a publish already claimed it.
    fn deregister(&self, channel: Channel, id: uuid::Uuid) {
        let mut registry = self.registry.lock().expect("hub registry poisoned");
        if let Some(slots) = registry.get_mut(&channel) {
            slots.retain(|slot| slot.id != id);
            if slots.is_empty() {
                registry.remove(&channel);
            }
        }
    }
}

/// Cancellable handle for one pending wait.
///
/// Resolution produces either [`WaitOutcome::Delivered`] or
/// [`WaitOutcome::Empty`]; the underlying oneshot slot guarantees at most
/// one completion. Dropping the guard removes the slot from the registry.
pub struct WaitGuard {
    hub: Arc<EventHub>,
    channel: Channel,
    id: uuid::Uuid,
    rx: Option<oneshot::Receiver<Vec<Envelope>>>,
    timeout: Duration,
}

impl WaitGuard {
    /// The channel this wait is registered on.
    #[must_use]
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Wait for an envelope or the timeout, whichever comes first.
    ///
    /// Resolves within the timeout plus scheduling jitter even when no
    /// publish ever occurs. If a publish fires in the same instant the
    /// timeout elapses, the delivered batch wins and the cancellation is a
    /// no-op.
    pub async fn wait(mut self) -> WaitOutcome {
        let Some(mut rx) = self.rx.take() else {
            return WaitOutcome::Empty;
        };

        match tokio::time::timeout(self.timeout, &mut rx).await {
            Ok(Ok(batch)) => WaitOutcome::Delivered(batch),
            // Sender dropped without sending: the hub was torn down.
            Ok(Err(_)) => WaitOutcome::Empty,
            Err(_elapsed) => self.cancel(rx),
        }
    }

    /// Timeout path: remove the slot, then honor a batch a racing publish
    /// may have sent just before the removal.
    fn cancel(&self, mut rx: oneshot::Receiver<Vec<Envelope>>) -> WaitOutcome {
        self.hub.deregister(self.channel, self.id);
        match rx.try_recv() {
            Ok(batch) => WaitOutcome::Delivered(batch),
            Err(_) => WaitOutcome::Empty,
        }
    }
}

impl Drop for WaitGuard {
    fn drop(&mut self) {
        // Idempotent: a publish that already claimed the slot wins.
        self.hub.deregister(self.channel, self.id);
    }
}
