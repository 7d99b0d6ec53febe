use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use roomcast_core::{ConnId, UserRecord};

struct Entry {
    record: UserRecord,
    seq: u64,
}

#[derive(Default)]
struct Inner {
    records: HashMap<ConnId, Entry>,
    next_seq: u64,
}

/// Connection registry: `conn_id -> UserRecord` for every named live connection.
///
/// One coarse mutex guards the whole map; each call is a single critical
/// section, so `snapshot` never observes a half-applied `register` and never
/// returns a record whose `unregister` has already returned.
///
/// Snapshot order is first-registration order. Re-registering a connection
/// overwrites its record in place and keeps its position.
#[derive(Default)]
pub struct ConnectionRegistry {
    inner: Mutex<Inner>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Every operation leaves the map consistent, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or overwrite the record for `id`.
    pub fn register(&self, id: ConnId, name: impl Into<String>) -> UserRecord {
        let record = UserRecord::online(id.clone(), name);
        let mut g = self.lock();
        if let Some(entry) = g.records.get_mut(&id) {
            entry.record = record.clone();
        } else {
            let seq = g.next_seq;
            g.next_seq += 1;
            g.records.insert(
                id,
                Entry {
                    record: record.clone(),
                    seq,
                },
            );
        }
        record
    }

    /// Remove and return the record, if the connection ever registered.
    pub fn unregister(&self, id: &ConnId) -> Option<UserRecord> {
        self.lock().records.remove(id).map(|e| e.record)
    }

    pub fn get(&self, id: &ConnId) -> Option<UserRecord> {
        self.lock().records.get(id).map(|e| e.record.clone())
    }

    /// All current records in registration order.
    pub fn snapshot(&self) -> Vec<UserRecord> {
        let g = self.lock();
        let mut entries: Vec<&Entry> = g.records.values().collect();
        entries.sort_by_key(|e| e.seq);
        entries.into_iter().map(|e| e.record.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
