//! Per-key async mutex.
//!
//! Serializes work that shares a key (one user's votes on one target, one
//! subscription pair) while letting different keys run in parallel. Slots are
//! created on demand and pruned when the last holder releases.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slot = Arc<AsyncMutex<()>>;

/// A set of async mutexes addressed by key.
#[derive(Debug)]
pub struct KeyedLock<K> {
    slots: Mutex<HashMap<K, Slot>>,
}

impl<K> Default for KeyedLock<K> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone> KeyedLock<K> {
    /// Create an empty lock set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    pub async fn lock(&self, key: K) -> KeyedGuard<'_, K> {
        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(slots.entry(key.clone()).or_default())
        };
        let guard = slot.lock_owned().await;
        KeyedGuard {
            owner: self,
            key,
            guard: Some(guard),
        }
    }

    /// Number of keys currently held or awaited.
    #[must_use]
    pub fn active_keys(&self) -> usize {
        self.slots.lock().len()
    }
}

/// Exclusive access to one key; released on drop.
pub struct KeyedGuard<'a, K: Eq + Hash + Clone> {
    owner: &'a KeyedLock<K>,
    key: K,
    guard: Option<OwnedMutexGuard<()>>,
}

impl<K: Eq + Hash + Clone> Drop for KeyedGuard<'_, K> {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut slots = self.owner.slots.lock();
        // Only the map still references the slot: nobody holds or awaits it.
        if let Some(slot) = slots.get(&self.key)
            && Arc::strong_count(slot) == 1
        {
            slots.remove(&self.key);
        }
    }
}
