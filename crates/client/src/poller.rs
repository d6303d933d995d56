//! Long-poll loop against the server wait endpoint.
//!
//! The loop issues bounded-duration wait requests and forwards received
//! batches to the local [`EnvelopeDispatcher`]. A server timeout (empty
//! batch) loops immediately since the server already bounded the wait. A
//! transport failure backs off before retrying so an unreachable server is
//! not hammered. A rejected session stops the loop; the pipeline never
//! re-authenticates on its own.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use salesdesk_domain::error::SalesdeskError;
use salesdesk_domain::envelope::Envelope;

use crate::dispatcher::EnvelopeDispatcher;
use crate::session::Session;

/// Transport port for one poll cycle.
pub trait PollTransport {
    /// Issue one wait request bounded by `timeout` (plus transport
    /// latency). An empty batch means the server timed out, which is a
    /// normal outcome, not an error.
    fn wait_for_events(
        &self,
        timeout: Duration,
    ) -> impl Future<Output = Result<Vec<Envelope>, SalesdeskError>> + Send;
}

impl<T: PollTransport + Send + Sync> PollTransport for Arc<T> {
    fn wait_for_events(
        &self,
        timeout: Duration,
    ) -> impl Future<Output = Result<Vec<Envelope>, SalesdeskError>> + Send {
        (**self).wait_for_events(timeout)
    }
}

/// Bounded exponential backoff applied after transport failures.
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    /// Delay after the first failure.
    pub base: Duration,
    /// Upper bound for the delay.
    pub cap: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(500),
            cap: Duration::from_secs(30),
        }
    }
}

impl BackoffPolicy {
    /// Delay before retry number `attempt` (1-based): doubles each failure,
    /// capped.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base.saturating_mul(1 << exponent).min(self.cap)
    }
}

/// Why the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerExit {
    /// Cooperative stop was requested.
    Stopped,
    /// The server rejected the session; the caller must re-authenticate.
    SessionExpired,
}

/// The client poll loop.
///
/// Cooperative stop is checked between cycles only: an in-flight wait is
/// allowed to expire naturally, which is always finite because the server
/// bounds every wait.
pub struct Poller<T> {
    transport: T,
    dispatcher: Arc<EnvelopeDispatcher>,
    session: Arc<Session>,
    wait_timeout: Duration,
    backoff: BackoffPolicy,
    stop: watch::Receiver<bool>,
}

impl<T: PollTransport> Poller<T> {
    /// Create a poll loop. Flip the `stop` channel to `true`, or drop its
    /// sender, to request a cooperative stop.
    pub fn new(
        transport: T,
        dispatcher: Arc<EnvelopeDispatcher>,
        session: Arc<Session>,
        wait_timeout: Duration,
        stop: watch::Receiver<bool>,
    ) -> Self {
        Self {
            transport,
            dispatcher,
            session,
            wait_timeout,
            backoff: BackoffPolicy::default(),
            stop,
        }
    }

    /// Override the default backoff policy.
    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Run until stopped or the session expires.
    pub async fn run(mut self) -> PollerExit {
        let mut failures: u32 = 0;
        loop {
            // A dropped sender can never request a stop later; treat the
            // closed channel as the stop request itself.
            if self.stop.has_changed().is_err() || *self.stop.borrow() {
                return PollerExit::Stopped;
            }

            match self.transport.wait_for_events(self.wait_timeout).await {
                Ok(batch) => {
                    failures = 0;
                    if batch.is_empty() {
                        // Server-side timeout: loop immediately.
                        continue;
                    }
                    tracing::debug!(count = batch.len(), "received envelope batch");
                    for envelope in &batch {
                        self.dispatcher.publish(envelope);
                    }
                }
                Err(SalesdeskError::SessionExpired) => {
                    tracing::warn!("poll rejected: session expired");
                    self.session.invalidate();
                    return PollerExit::SessionExpired;
                }
                Err(err) => {
                    failures += 1;
                    let delay = self.backoff.delay(failures);
                    tracing::warn!(%err, attempt = failures, ?delay, "poll failed, backing off");
                    tokio::select! {
                        () = tokio::time::sleep(delay) => {}
                        changed = self.stop.changed() => {
                            // A closed channel must not cancel the sleep on
                            // every retry; it ends the loop instead.
                            if changed.is_err() {
                                return PollerExit::Stopped;
                            }
                        }
                    }
                }
            }
        }
    }
}
