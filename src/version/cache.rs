//! Two-tier memoization of check outcomes
//!
//! Every outcome lives in a per-process map. When a cache file is configured,
//! the whole map is also written there after each fresh computation so other
//! processes on the host can pick it up. The file is shared without locking:
//! concurrent writers may lose or corrupt each other's snapshot, which only
//! costs an extra remote check later. The in-memory map stays authoritative
//! for the lifetime of the process.

use std::collections::HashMap;
use std::fs;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::version::error::StoreError;
use crate::version::types::{CacheEntry, CacheKey, Outcome};

/// On-disk layout: the full key/entry mapping
type Snapshot = Vec<(CacheKey, CacheEntry)>;

pub struct ResultCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    /// Cache file; cleared for the rest of the process after an unrecoverable failure
    store: Mutex<Option<PathBuf>>,
}

impl ResultCache {
    /// Cache backed by the shared file at `path`, warmed from its current contents.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!("Using shared result cache at {:?}", path);

        let cache = Self {
            entries: Mutex::new(HashMap::new()),
            store: Mutex::new(Some(path)),
        };
        let adopted = cache.reconcile();
        debug!("Loaded {} entries from shared result cache", adopted);

        cache
    }

    /// Cache that never touches the filesystem
    pub fn in_memory() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            store: Mutex::new(None),
        }
    }

    /// Whether results are still being shared through the cache file
    pub fn is_persistent(&self) -> bool {
        self.lock_store().is_some()
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.lock_entries().get(key).cloned()
    }

    /// Return the memoized outcome for `key` if younger than `ttl`, otherwise
    /// run `compute`, record its outcome and share it through the cache file.
    ///
    /// The value returned on a miss is always the one `compute` produced, even
    /// if reconciliation adopts a newer entry for the same key from the file.
    pub async fn get_or_compute<F, Fut>(&self, key: CacheKey, ttl: Duration, compute: F) -> Outcome
    where
        F: FnOnce(CacheKey) -> Fut,
        Fut: Future<Output = Outcome>,
    {
        let now = current_timestamp_ms();

        if let Some(entry) = self.fresh_entry(&key, ttl, now) {
            debug!("Cache hit for {}", key);
            return entry.outcome;
        }

        debug!("Cache miss for {}", key);
        let outcome = compute(key.clone()).await;

        self.insert(key, now, outcome.clone());
        self.reconcile();
        self.save();

        outcome
    }

    /// Adopt entries from the cache file that are newer than what is in memory.
    ///
    /// A missing or corrupt file counts as empty and is rewritten by the next
    /// save; any other I/O error switches the cache to memory only.
    ///
    /// Returns the number of adopted entries.
    pub fn reconcile(&self) -> usize {
        let Some(path) = self.store_path() else {
            return 0;
        };

        match load_snapshot(&path) {
            Ok(snapshot) => self.merge(snapshot),
            Err(StoreError::Io(e)) if e.kind() == ErrorKind::NotFound => 0,
            Err(e @ StoreError::Corrupt(_)) => {
                // Overwritten by the next save
                debug!("Ignoring unreadable cache file {:?}: {}", path, e);
                0
            }
            Err(e) => {
                self.disable(&path, &e);
                0
            }
        }
    }

    /// Merge `snapshot` into memory. An entry replaces the in-memory one only
    /// when its timestamp is strictly greater; ties keep the in-memory entry.
    fn merge(&self, snapshot: Snapshot) -> usize {
        let mut entries = self.lock_entries();
        let mut adopted = 0;

        for (key, entry) in snapshot {
            let newer = entries
                .get(&key)
                .is_none_or(|current| entry.checked_at > current.checked_at);
            if newer {
                entries.insert(key, entry);
                adopted += 1;
            }
        }

        adopted
    }

    fn fresh_entry(&self, key: &CacheKey, ttl: Duration, now: i64) -> Option<CacheEntry> {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        self.lock_entries()
            .get(key)
            .filter(|entry| now.saturating_sub(entry.checked_at) < ttl_ms)
            .cloned()
    }

    fn insert(&self, key: CacheKey, now: i64, outcome: Outcome) {
        let mut entries = self.lock_entries();
        // Timestamps for a key never move backwards
        let checked_at = entries
            .get(&key)
            .map_or(now, |current| current.checked_at.max(now));
        entries.insert(
            key,
            CacheEntry {
                checked_at,
                outcome,
            },
        );
    }

    fn save(&self) {
        let Some(path) = self.store_path() else {
            return;
        };

        let snapshot: Snapshot = self
            .lock_entries()
            .iter()
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect();

        match write_snapshot(&path, &snapshot) {
            Ok(()) => debug!("Saved {} entries to {:?}", snapshot.len(), path),
            Err(e) => self.disable(&path, &e),
        }
    }

    fn disable(&self, path: &Path, error: &StoreError) {
        warn!(
            "Shared result cache {:?} unavailable, keeping results in memory only: {}",
            path, error
        );
        *self.lock_store() = None;
    }

    fn store_path(&self) -> Option<PathBuf> {
        self.lock_store().clone()
    }

    // A panic while holding either lock cannot leave the data half-updated,
    // so poisoned locks are taken over as-is.
    fn lock_entries(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_store(&self) -> MutexGuard<'_, Option<PathBuf>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Get current timestamp in milliseconds since UNIX epoch
fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn load_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
    let contents = fs::read(path)?;
    Ok(serde_json::from_slice(&contents)?)
}

fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), StoreError> {
    let contents = serde_json::to_vec(snapshot)?;
    fs::write(path, contents)?;
    Ok(())
}
