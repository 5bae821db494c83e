pub mod adapter;
pub mod memory;
pub mod mock;
pub mod redis;

use crate::error::StorageResult;
use crate::models::{AccessData, AuthorizeData, Client};
use async_trait::async_trait;

pub use self::adapter::BucketStorage;
pub use self::memory::MemoryBucket;
pub use self::mock::MockBucket;
pub use self::redis::RedisBucket;

/// Key prefix for records stored under an access token.
pub const ACCESS_TOKEN_KEY_PREFIX: &str = "a_";
/// Key prefix for records stored under a refresh token.
pub const REFRESH_TOKEN_KEY_PREFIX: &str = "r_";

/// Client ids and authorization codes are stored unprefixed, so they must
/// never start with one of the token prefixes.
pub fn access_key(token: &str) -> String {
    format!("{}{}", ACCESS_TOKEN_KEY_PREFIX, token)
}

pub fn refresh_key(token: &str) -> String {
    format!("{}{}", REFRESH_TOKEN_KEY_PREFIX, token)
}

/// The three physical primitives the adapter needs from a key-value store.
///
/// Documents are opaque strings. A TTL of zero means the record never expires.
#[async_trait]
pub trait Bucket: Send + Sync {
    /// Fetch a document, `None` when the key is absent or expired.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Insert or replace a document, expiring it after `ttl_secs` seconds.
    async fn upsert(&self, key: &str, document: String, ttl_secs: u32) -> StorageResult<()>;

    /// Delete a document, returning whether a key was actually removed.
    async fn remove(&self, key: &str) -> StorageResult<bool>;

    /// Release connections held by the bucket.
    async fn close(&self) -> StorageResult<()> {
        Ok(())
    }
}

/// Persistence contract an OAuth2 server needs for its runtime state.
///
/// Loads and removes of absent keys fail with `StorageError::NotFound`.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Saves a client record. The record must carry a non-empty `id`.
    async fn set_client(&self, client: &Client) -> StorageResult<()>;

    /// Loads a client by its id.
    async fn get_client(&self, id: &str) -> StorageResult<Client>;

    /// Saves an authorization code grant; it expires after `expires_in` seconds.
    async fn save_authorize(&self, data: &AuthorizeData) -> StorageResult<()>;

    /// Loads an authorization code grant together with its client.
    async fn load_authorize(&self, code: &str) -> StorageResult<AuthorizeData>;

    /// Revokes or deletes an authorization code.
    async fn remove_authorize(&self, code: &str) -> StorageResult<()>;

    /// Saves access data under its access token, and the previous access data
    /// under the refresh token when both are present.
    ///
    /// The two writes are not atomic. If the refresh write fails, the access
    /// record stays persisted and the refresh write's error is returned.
    async fn save_access(&self, data: &AccessData) -> StorageResult<()>;

    /// Loads access data by access token.
    async fn load_access(&self, token: &str) -> StorageResult<AccessData>;

    /// Deletes the access token record only; the paired refresh record stays.
    async fn remove_access(&self, token: &str) -> StorageResult<()>;

    /// Loads the access data stored under a refresh token.
    async fn load_refresh(&self, token: &str) -> StorageResult<AccessData>;

    /// Deletes the refresh token record only; the paired access record stays.
    async fn remove_refresh(&self, token: &str) -> StorageResult<()>;

    /// Closes connections and cleans up resources.
    async fn close(&self) -> StorageResult<()>;
}
