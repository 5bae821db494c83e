use super::{Bucket, MemoryBucket};
use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// A `MemoryBucket` wrapper that can be told to fail, for testing error paths.
#[derive(Default)]
pub struct MockBucket {
    inner: MemoryBucket,
    upsert_calls: AtomicUsize,
    // 1-based upsert call that fails; 0 disables injection.
    fail_upsert_at: AtomicUsize,
    fail_gets: AtomicBool,
    fail_removes: AtomicBool,
}

impl MockBucket {
    pub fn new() -> Self {
        MockBucket::default()
    }

    /// Makes the `n`-th upsert call (counting from 1) fail with a backend error.
    pub fn fail_upsert_at(&self, n: usize) {
        self.fail_upsert_at.store(n, Ordering::SeqCst);
    }

    /// Makes every get fail with a backend error.
    pub fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    /// Makes every remove fail with a backend error.
    pub fn fail_removes(&self, fail: bool) {
        self.fail_removes.store(fail, Ordering::SeqCst);
    }

    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &MemoryBucket {
        &self.inner
    }
}

fn injected(flag: &AtomicBool, op: &str) -> StorageResult<()> {
    if flag.load(Ordering::SeqCst) {
        return Err(StorageError::Backend(format!("injected {} failure", op)));
    }
    Ok(())
}

#[async_trait]
impl Bucket for MockBucket {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        injected(&self.fail_gets, "get")?;
        self.inner.get(key).await
    }

    async fn upsert(&self, key: &str, document: String, ttl_secs: u32) -> StorageResult<()> {
        let call = self.upsert_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_upsert_at.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("injected upsert failure".to_string()));
        }
        self.inner.upsert(key, document, ttl_secs).await
    }

    async fn remove(&self, key: &str) -> StorageResult<bool> {
        injected(&self.fail_removes, "remove")?;
        self.inner.remove(key).await
    }
}
