use super::Bucket;
use crate::error::StorageResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

struct Entry {
    document: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(deadline) if deadline <= now)
    }
}

/// In-process bucket that emulates per-key TTLs.
///
/// Expired entries are dropped lazily when touched, or eagerly through
/// `purge_expired`. There is no background sweeper.
#[derive(Default)]
pub struct MemoryBucket {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryBucket {
    pub fn new() -> Self {
        MemoryBucket {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // Returns the live entry for `key`, purging it first if it has expired.
    fn live<'a>(entries: &'a mut HashMap<String, Entry>, key: &str) -> Option<&'a Entry> {
        let now = Instant::now();
        if entries.get(key).map_or(false, |entry| entry.is_expired(now)) {
            entries.remove(key);
        }
        entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        let mut entries = self.lock();
        Self::live(&mut entries, key).is_some()
    }

    /// `None` when the key is absent, `Some(None)` when it never expires,
    /// otherwise the time left before it does.
    pub fn ttl_of(&self, key: &str) -> Option<Option<Duration>> {
        let mut entries = self.lock();
        let now = Instant::now();
        Self::live(&mut entries, key).map(|entry| {
            entry
                .expires_at
                .map(|deadline| deadline.saturating_duration_since(now))
        })
    }

    /// Drops every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.lock();
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.lock()
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Bucket for MemoryBucket {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let mut entries = self.lock();
        Ok(Self::live(&mut entries, key).map(|entry| entry.document.clone()))
    }

    async fn upsert(&self, key: &str, document: String, ttl_secs: u32) -> StorageResult<()> {
        let expires_at = match ttl_secs {
            0 => None,
            secs => Some(Instant::now() + Duration::from_secs(u64::from(secs))),
        };
        self.lock().insert(
            key.to_string(),
            Entry {
                document,
                expires_at,
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<bool> {
        let mut entries = self.lock();
        let now = Instant::now();
        Ok(entries
            .remove(key)
            .map_or(false, |entry| !entry.is_expired(now)))
    }
}
