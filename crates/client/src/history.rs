//! Bounded store of executed commands.
//!
//! One instance lives per client session. Records are immutable once added;
//! the store evicts oldest-first when full and notifies its subscribers with
//! each new record.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use salesdesk_domain::command::CommandRecord;

use crate::dispatcher::{Dispatcher, Observer, SubscriptionId};

/// FIFO-bounded sequence of [`CommandRecord`]s with subscribers.
pub struct HistoryStore {
    capacity: usize,
    records: Mutex<VecDeque<Arc<CommandRecord>>>,
    subscribers: Dispatcher<CommandRecord>,
}

impl HistoryStore {
    /// Create an empty store retaining at most `capacity` records.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: Mutex::new(VecDeque::new()),
            subscribers: Dispatcher::new(),
        }
    }

    /// Append a record, evicting the oldest if the bound is reached, then
    /// notify subscribers with the new record.
    pub fn add_record(&self, record: CommandRecord) -> Arc<CommandRecord> {
        let record = Arc::new(record);
        {
            let mut records = self.records.lock().expect("history store poisoned");
            records.push_back(Arc::clone(&record));
            while records.len() > self.capacity {
                records.pop_front();
            }
        }
        self.subscribers.publish(&record);
        record
    }

    /// Read-only snapshot of the retained records, oldest-first.
    #[must_use]
    pub fn records(&self) -> Vec<Arc<CommandRecord>> {
        let records = self.records.lock().expect("history store poisoned");
        records.iter().cloned().collect()
    }

    /// Number of retained records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().expect("history store poisoned").len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empty the store. Subscribers persist across clears; callers must
    /// unsubscribe explicitly for teardown.
    pub fn clear(&self) {
        let mut records = self.records.lock().expect("history store poisoned");
        records.clear();
    }

    /// Register a subscriber for new records.
    pub fn subscribe(&self, observer: Arc<dyn Observer<CommandRecord>>) -> SubscriptionId {
        self.subscribers.subscribe(observer)
    }

    /// Remove a subscriber.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.unsubscribe(id);
    }
}
