//! Keyed async locks serialising read-validate-write sequences.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Registry of per-key mutexes.
///
/// Entries are created on first use and dropped again once the last guard
/// for a key is released, so the map only holds keys with live holders or
/// waiters.
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

/// Holds the lock for one key until dropped.
#[derive(Debug)]
pub struct KeyGuard {
    key: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl LockRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for and takes the lock for `key`.
    pub async fn acquire(&self, key: impl Into<Uuid>) -> KeyGuard {
        let key = key.into();
        let mutex = self
            .locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = mutex.lock_owned().await;
        KeyGuard {
            key,
            guard: Some(guard),
            locks: Arc::clone(&self.locks),
        }
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no key is tracked.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        // Release first so the registry's Arc is the last one left.
        self.guard.take();
        self.locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
