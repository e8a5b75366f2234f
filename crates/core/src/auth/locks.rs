//! Per-session mutual exclusion, keyed by the session's id.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Lock table with one mutex per session id. Sessions never share a lock.
#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock of session `id`.
    ///
    /// The entry is dropped again once no other request holds or waits on it,
    /// so the table only carries sessions with requests in flight.
    pub fn with_lock<R>(&self, id: &str, f: impl FnOnce() -> R) -> R {
        // Clone out of the map so the shard lock is not held while waiting
        let lock = self.locks.entry(id.to_string()).or_default().clone();
        let result = {
            let _guard = lock.lock();
            f()
        };

        // Release our clone first so the last request out always sees a count of one
        let ours = Arc::downgrade(&lock);
        drop(lock);
        self.locks.remove_if(id, |_, l| {
            Arc::strong_count(l) == 1 && std::ptr::eq(Arc::as_ptr(l), ours.as_ptr())
        });
        result
    }

    /// Sessions with a request currently holding or waiting on their lock
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
