use thiserror::Error;

/// Errors raised while validating a `StorageConfig`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("empty connection string provided")]
    EmptyConnectionString,
    #[error("empty bucket name provided")]
    EmptyBucketName,
    #[error("environment variable {0} must be set")]
    MissingEnv(&'static str),
}

/// Errors returned by the storage adapter and its buckets.
///
/// Store-layer failures keep the underlying `redis::RedisError` as their
/// source, so callers can still inspect the driver's error kind.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not open bucket: {0}")]
    Connection(#[source] redis::RedisError),

    #[error("key not found: {key}")]
    NotFound { key: String },

    #[error(transparent)]
    Store(#[from] redis::RedisError),

    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid record: {0}")]
    InvalidRecord(&'static str),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    pub fn not_found(key: impl Into<String>) -> Self {
        StorageError::NotFound { key: key.into() }
    }

    /// True when the key was never written, or has expired or been removed.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
