// src/config.rs
use crate::error::ConfigError;
use dotenv::dotenv;
use std::env;
use std::fmt;

pub const CONNECTION_STRING_ENV: &str = "STORAGE_CONNECTION_STRING";
pub const BUCKET_NAME_ENV: &str = "STORAGE_BUCKET_NAME";
pub const BUCKET_PASSWORD_ENV: &str = "STORAGE_BUCKET_PASSWORD";

/// Settings needed to open the storage bucket.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct StorageConfig {
    /// Network address of the store, e.g. `redis://127.0.0.1:6379/0`.
    pub connection_string: String,
    /// Logical namespace that prefixes every key written by the adapter.
    pub bucket_name: String,
    /// Credential for the bucket. Empty means "use whatever the URL carries".
    pub bucket_password: String,
}

impl StorageConfig {
    pub fn new(
        connection_string: impl Into<String>,
        bucket_name: impl Into<String>,
        bucket_password: impl Into<String>,
    ) -> Self {
        StorageConfig {
            connection_string: connection_string.into(),
            bucket_name: bucket_name.into(),
            bucket_password: bucket_password.into(),
        }
    }

    /// Loads the configuration from the environment (and a `.env` file if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let connection_string = env::var(CONNECTION_STRING_ENV)
            .map_err(|_| ConfigError::MissingEnv(CONNECTION_STRING_ENV))?;
        let bucket_name =
            env::var(BUCKET_NAME_ENV).map_err(|_| ConfigError::MissingEnv(BUCKET_NAME_ENV))?;
        let bucket_password = env::var(BUCKET_PASSWORD_ENV).unwrap_or_default();

        let config = StorageConfig {
            connection_string,
            bucket_name,
            bucket_password,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connection_string.is_empty() {
            return Err(ConfigError::EmptyConnectionString);
        }

        if self.bucket_name.is_empty() {
            return Err(ConfigError::EmptyBucketName);
        }

        Ok(())
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.bucket_password.is_empty() {
            ""
        } else {
            "***"
        };
        f.debug_struct("StorageConfig")
            .field("connection_string", &self.connection_string)
            .field("bucket_name", &self.bucket_name)
            .field("bucket_password", &password)
            .finish()
    }
}
