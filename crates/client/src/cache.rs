//! Cache/orchestration layer over the command executor.
//!
//! Read paths are check-then-populate against keyed maps; mutations clear
//! the derived entries wholesale and fan out one domain-change event.
//! Entries are built completely before insertion, so a reader never sees a
//! partially constructed value. Each map carries a generation counter: a
//! read snapshots it before going to the backend and only inserts if no
//! invalidation bumped it in between, so a value computed before a
//! mutation can never repopulate the cache after the clear.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use salesdesk_domain::change::{ChangeEvent, DomainKind};
use salesdesk_domain::command::{Command, CommandOutcome};
use salesdesk_domain::error::SalesdeskError;
use salesdesk_domain::query::{HistoryPage, HistorySearchQuery, StatisticsQuery, StatisticsReport};

use crate::commands::{BackendApi, CommandExecutor};
use crate::dispatcher::ChangeDispatcher;

/// Derived-read caching plus post-command invalidation and event fan-out.
pub struct CacheService<B> {
    executor: CommandExecutor<B>,
    dispatcher: Arc<ChangeDispatcher>,
    statistics: Mutex<HashMap<String, Arc<StatisticsReport>>>,
    stats_generation: AtomicU64,
    searches: Mutex<HashMap<String, Arc<HistoryPage>>>,
    search_generation: AtomicU64,
}

impl<B: BackendApi> CacheService<B> {
    /// Create a new service around an executor.
    pub fn new(executor: CommandExecutor<B>, dispatcher: Arc<ChangeDispatcher>) -> Self {
        Self {
            executor,
            dispatcher,
            statistics: Mutex::new(HashMap::new()),
            stats_generation: AtomicU64::new(0),
            searches: Mutex::new(HashMap::new()),
            search_generation: AtomicU64::new(0),
        }
    }

    /// Execute a mutating command; on success, invalidate the derived
    /// caches for the mutated kind and publish exactly one
    /// [`ChangeEvent`] through the local dispatcher.
    ///
    /// A failed command leaves the caches and the dispatcher untouched.
    ///
    /// # Errors
    ///
    /// Propagates the executor's typed error.
    pub async fn run(&self, command: Command) -> Result<CommandOutcome, SalesdeskError> {
        let kind = command.kind();
        let outcome = self.executor.execute(command).await?;

        self.invalidate(kind);
        self.dispatcher.publish(&ChangeEvent::new(kind));

        Ok(outcome)
    }

    /// Yearly statistics, from cache when present.
    ///
    /// # Errors
    ///
    /// Propagates the backend's typed error on a cache miss.
    pub async fn yearly_statistics(
        &self,
        query: StatisticsQuery,
    ) -> Result<Arc<StatisticsReport>, SalesdeskError> {
        let key = query.cache_key();
        let generation = self.stats_generation.load(Ordering::Acquire);
        if let Some(hit) = self.statistics.lock().expect("stats cache poisoned").get(&key) {
            return Ok(Arc::clone(hit));
        }

        let report = Arc::new(self.executor.backend().yearly_statistics(query).await?);
        let mut statistics = self.statistics.lock().expect("stats cache poisoned");
        // An invalidation may have run while the backend call was in
        // flight; serve the value but keep the stale entry out of the map.
        if self.stats_generation.load(Ordering::Acquire) == generation {
            statistics.insert(key, Arc::clone(&report));
        }
        drop(statistics);
        Ok(report)
    }

    /// One page of a document-history search, from cache when present.
    ///
    /// Two independently constructed queries with the same filter set share
    /// a cache entry (canonical key, see
    /// [`HistorySearchQuery::cache_key`]).
    ///
    /// # Errors
    ///
    /// Propagates the backend's typed error on a cache miss.
    pub async fn search_history(
        &self,
        query: HistorySearchQuery,
    ) -> Result<Arc<HistoryPage>, SalesdeskError> {
        let key = query.cache_key();
        let generation = self.search_generation.load(Ordering::Acquire);
        if let Some(hit) = self.searches.lock().expect("search cache poisoned").get(&key) {
            return Ok(Arc::clone(hit));
        }

        let page = Arc::new(self.executor.backend().search_history(query).await?);
        let mut searches = self.searches.lock().expect("search cache poisoned");
        if self.search_generation.load(Ordering::Acquire) == generation {
            searches.insert(key, Arc::clone(&page));
        }
        drop(searches);
        Ok(page)
    }

    /// Wholesale invalidation: statistics derive from contracts and
    /// invoices; the history search derives from every record family.
    fn invalidate(&self, kind: DomainKind) {
        if matches!(kind, DomainKind::Contract | DomainKind::Invoice) {
            let mut statistics = self.statistics.lock().expect("stats cache poisoned");
            // Bumped under the map lock so a concurrent read cannot insert
            // a pre-clear value after we release it.
            self.stats_generation.fetch_add(1, Ordering::AcqRel);
            statistics.clear();
        }
        let mut searches = self.searches.lock().expect("search cache poisoned");
        self.search_generation.fetch_add(1, Ordering::AcqRel);
        searches.clear();
        drop(searches);
        tracing::debug!(%kind, "invalidated derived caches");
    }
}
