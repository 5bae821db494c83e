// Persist OAuth2 server state (clients, authorization codes, access and
// refresh tokens) in a key-value bucket, delegating expiry to the store's TTL.
pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use config::StorageConfig;
pub use error::{ConfigError, StorageError, StorageResult};
pub use models::{AccessData, AuthorizeData, Client};
pub use storage::{BucketStorage, StorageBackend};

/// Adapter over a Redis bucket.
pub type RedisStorage = BucketStorage<storage::RedisBucket>;

/// Adapter over an in-process bucket.
pub type MemoryStorage = BucketStorage<storage::MemoryBucket>;
