use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::types::{TransferRecord, TransferStatus};

/// Notification delivered to store subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// A record was created or changed; carries the new value.
    Updated(TransferRecord),
    /// Every record was removed.
    Cleared,
}

/// Handle returned by [`TransferStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

/// Per-file transfer records with synchronous change notification.
///
/// Holds at most one [`TransferRecord`] per file name. Every mutation is
/// pushed to all subscribers on the calling thread, after the record lock
/// is released, so a subscriber may read the store from its callback. Each
/// event goes to the subscribers registered when it was raised; a callback
/// may subscribe or unsubscribe, and the change applies from the next event.
pub struct TransferStore {
    records: RwLock<Records>,
    subscribers: RwLock<Vec<(SubscriptionId, Subscriber)>>,
    next_id: AtomicU64,
}

#[derive(Default)]
struct Records {
    by_id: HashMap<String, TransferRecord>,
    /// Insertion order of `by_id` keys, for stable snapshots.
    order: Vec<String>,
}

impl Records {
    fn upsert(&mut self, file_id: &str) -> &mut TransferRecord {
        if !self.by_id.contains_key(file_id) {
            self.order.push(file_id.to_string());
        }
        self.by_id
            .entry(file_id.to_string())
            .or_insert_with(|| TransferRecord::new(file_id))
    }
}

impl Default for TransferStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Records::default()),
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Registers a change callback.
    pub fn subscribe(
        &self,
        callback: impl Fn(&StoreEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut subs = self.subscribers.write().unwrap();
        subs.push((id, Arc::new(callback)));
        id
    }

    /// Removes a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscribers.write().unwrap();
        let before = subs.len();
        subs.retain(|(sid, _)| *sid != id);
        subs.len() != before
    }

    /// Sets the progress percentage of `file_id`, creating the record if needed.
    ///
    /// Values are clamped into `[0, 100]`; `NaN` counts as 0. The status is
    /// left as it is.
    pub fn set_progress(&self, file_id: &str, progress: f64) {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 100.0)
        };

        let updated = {
            let mut records = self.records.write().unwrap();
            let record = records.upsert(file_id);
            record.progress = progress;
            record.clone()
        };

        trace!(file = file_id, progress, "progress updated");
        self.notify(&StoreEvent::Updated(updated));
    }

    /// Sets the status of `file_id`, creating the record if needed.
    ///
    /// `InProgress` begins a new attempt: any earlier record for the same file
    /// is replaced and its progress reset to 0.
    pub fn set_status(&self, file_id: &str, status: TransferStatus) {
        let updated = {
            let mut records = self.records.write().unwrap();
            let record = records.upsert(file_id);
            if matches!(status, TransferStatus::InProgress(_)) {
                record.progress = 0.0;
            }
            record.status = status;
            record.clone()
        };

        trace!(file = file_id, status = ?updated.status, "status updated");
        self.notify(&StoreEvent::Updated(updated));
    }

    /// Removes every record.
    pub fn clear_all(&self) {
        {
            let mut records = self.records.write().unwrap();
            records.by_id.clear();
            records.order.clear();
        }
        self.notify(&StoreEvent::Cleared);
    }

    /// Returns the record for `file_id`.
    pub fn get(&self, file_id: &str) -> Option<TransferRecord> {
        let records = self.records.read().unwrap();
        records.by_id.get(file_id).cloned()
    }

    /// Returns all records in the order they were first created.
    pub fn snapshot(&self) -> Vec<TransferRecord> {
        let records = self.records.read().unwrap();
        records
            .order
            .iter()
            .filter_map(|id| records.by_id.get(id).cloned())
            .collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.read().unwrap().by_id.len()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if every named file has a terminal record.
    ///
    /// An empty list yields `false`: there is nothing that finished.
    pub fn all_terminal<'a>(&self, file_ids: impl IntoIterator<Item = &'a str>) -> bool {
        let records = self.records.read().unwrap();
        let mut any = false;
        for id in file_ids {
            any = true;
            match records.by_id.get(id) {
                Some(r) if r.status.is_terminal() => {}
                _ => return false,
            }
        }
        any
    }

    fn notify(&self, event: &StoreEvent) {
        let subs: Vec<Subscriber> = {
            let subs = self.subscribers.read().unwrap();
            subs.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        for cb in subs {
            cb(event);
        }
    }
}
