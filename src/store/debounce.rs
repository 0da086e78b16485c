//! Per-key debounced persistence.
//!
//! Each key has at most one pending write. Scheduling a write for a key that
//! already has one aborts the pending timer and starts a fresh window with the
//! new value, so a burst of mutations collapses into a single write of the
//! last value. The value is captured when the write is scheduled.
//!
//! Writes for one key never overlap: timers and [`Debouncer::flush`] take the
//! key's write lock before claiming the pending value, so a value claimed
//! later always reaches storage later.

use crate::config::DebounceConfig;
use crate::error::Result;
use crate::storage::{Storage, StorageKey};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::sync::Mutex as WriteLock;
use tokio::task::JoinHandle;

struct PendingWrite {
    generation: u64,
    value: Arc<str>,
    handle: JoinHandle<()>,
}

type PendingMap = Arc<Mutex<HashMap<StorageKey, PendingWrite>>>;
type WriteLocks = Arc<[WriteLock<()>; 3]>;

pub struct Debouncer {
    storage: Arc<dyn Storage>,
    config: DebounceConfig,
    runtime: Handle,
    pending: PendingMap,
    write_locks: WriteLocks,
    generation: AtomicU64,
}

fn write_slot(key: StorageKey) -> usize {
    match key {
        StorageKey::Columns => 0,
        StorageKey::Items => 1,
        StorageKey::Settings => 2,
    }
}

fn lock(pending: &PendingMap) -> MutexGuard<'_, HashMap<StorageKey, PendingWrite>> {
    pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Debouncer {
    /// Creates a debouncer whose timers run on the given runtime
    pub fn new(storage: Arc<dyn Storage>, config: DebounceConfig, runtime: Handle) -> Self {
        Self {
            storage,
            config,
            runtime,
            pending: Arc::new(Mutex::new(HashMap::new())),
            write_locks: Arc::new([WriteLock::new(()), WriteLock::new(()), WriteLock::new(())]),
            generation: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &DebounceConfig {
        &self.config
    }

    /// Schedules `value` to be written under `key` once the key's window
    /// elapses without another schedule for the same key.
    pub fn schedule(&self, key: StorageKey, value: String) {
        let delay = self.config.delay_for(key);
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let value: Arc<str> = Arc::from(value);

        let mut pending = lock(&self.pending);
        if let Some(previous) = pending.remove(&key) {
            previous.handle.abort();
            tracing::trace!(key = %key, "restarting debounce window");
        }

        let storage = Arc::clone(&self.storage);
        let shared = Arc::clone(&self.pending);
        let write_locks = Arc::clone(&self.write_locks);
        let to_write = Arc::clone(&value);
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let _writing = write_locks[write_slot(key)].lock().await;

            // Only the newest schedule for this key may write
            {
                let mut pending = lock(&shared);
                let is_current = pending
                    .get(&key)
                    .is_some_and(|entry| entry.generation == generation);
                if !is_current {
                    return;
                }
                pending.remove(&key);
            }

            match storage.write(key, &to_write).await {
                Ok(()) => tracing::debug!(key = %key, bytes = to_write.len(), "persisted"),
                Err(e) => tracing::warn!(key = %key, error = %e, "debounced write failed"),
            }
        });

        pending.insert(
            key,
            PendingWrite {
                generation,
                value,
                handle,
            },
        );
    }

    /// True while a write for `key` is waiting for its window to elapse
    pub fn is_pending(&self, key: StorageKey) -> bool {
        lock(&self.pending).contains_key(&key)
    }

    pub fn pending_keys(&self) -> Vec<StorageKey> {
        let pending = lock(&self.pending);
        StorageKey::ALL
            .into_iter()
            .filter(|key| pending.contains_key(key))
            .collect()
    }

    /// Drops every pending write without persisting it
    pub fn cancel_all(&self) {
        for (_, entry) in lock(&self.pending).drain() {
            entry.handle.abort();
        }
    }

    /// Writes every pending value immediately, in key order.
    ///
    /// A debounced write already in flight for a key finishes first.
    pub async fn flush(&self) -> Result<()> {
        for key in StorageKey::ALL {
            let _writing = self.write_locks[write_slot(key)].lock().await;
            let claimed = lock(&self.pending).remove(&key);
            let Some(entry) = claimed else {
                continue;
            };
            entry.handle.abort();

            self.storage.write(key, &entry.value).await?;
            tracing::debug!(key = %key, "flushed pending write");
        }
        Ok(())
    }
}
