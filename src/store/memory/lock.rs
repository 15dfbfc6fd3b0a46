use std::collections::HashSet;
use std::sync::{Arc, Condvar, Mutex};

use uuid::Uuid;

use crate::store::memory::InMemoryStoreError;
use crate::store::{EventStoreLockGuard, UnlockOnDrop};

/// Set of aggregate ids currently locked, plus a condition variable used to wake up waiters.
#[derive(Default)]
pub(super) struct AggregateLocks {
    held: Mutex<HashSet<Uuid>>,
    released: Condvar,
}

impl AggregateLocks {
    /// Blocks until no other guard holds `aggregate_id`, then takes it.
    ///
    /// Not reentrant: locking the same aggregate twice from one thread deadlocks.
    pub(super) fn acquire(locks: &Arc<Self>, aggregate_id: Uuid) -> Result<EventStoreLockGuard, InMemoryStoreError> {
        let mut held = locks.held.lock().map_err(|_| InMemoryStoreError::Poisoned)?;

        while held.contains(&aggregate_id) {
            held = locks
                .released
                .wait(held)
                .map_err(|_| InMemoryStoreError::Poisoned)?;
        }

        held.insert(aggregate_id);

        Ok(EventStoreLockGuard::new(InMemoryLockGuard {
            locks: Arc::clone(locks),
            aggregate_id,
        }))
    }
}

/// Concrete implementation of [`EventStoreLockGuard`] for the in-memory store.
///
/// When dropped the aggregate id is released and every waiter is notified.
struct InMemoryLockGuard {
    locks: Arc<AggregateLocks>,
    aggregate_id: Uuid,
}

impl Drop for InMemoryLockGuard {
    fn drop(&mut self) {
        if let Ok(mut held) = self.locks.held.lock() {
            held.remove(&self.aggregate_id);
        }
        self.locks.released.notify_all();
    }
}

impl UnlockOnDrop for InMemoryLockGuard {}
