use super::redis::RedisBucket;
use super::{access_key, refresh_key, Bucket, StorageBackend};
use crate::config::StorageConfig;
use crate::error::{StorageError, StorageResult};
use crate::models::{AccessData, AuthorizeData, Client};
use async_trait::async_trait;
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Storage adapter mapping OAuth2 records onto a single bucket.
///
/// The handle holds no mutable state of its own; clones share the bucket.
pub struct BucketStorage<B> {
    bucket: Arc<B>,
}

impl<B> Clone for BucketStorage<B> {
    fn clone(&self) -> Self {
        BucketStorage {
            bucket: Arc::clone(&self.bucket),
        }
    }
}

impl BucketStorage<RedisBucket> {
    /// Validates `config` and opens the configured bucket.
    pub async fn connect(config: &StorageConfig) -> StorageResult<Self> {
        let bucket = RedisBucket::open(config).await?;
        Ok(BucketStorage::new(bucket))
    }
}

impl<B: Bucket> BucketStorage<B> {
    pub fn new(bucket: B) -> Self {
        BucketStorage {
            bucket: Arc::new(bucket),
        }
    }

    pub fn bucket(&self) -> &B {
        &self.bucket
    }

    async fn put<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: u32,
    ) -> StorageResult<()> {
        let document = serde_json::to_string(value)?;
        debug!("Upserting key {} (ttl={}s)", key, ttl_secs);
        self.bucket
            .upsert(key, document, ttl_secs)
            .await
            .map_err(|err| {
                error!("Error upserting key {}: {}", key, err);
                err
            })
    }

    async fn fetch<T: DeserializeOwned>(&self, key: &str) -> StorageResult<T> {
        debug!("Fetching key {}", key);
        match self.bucket.get(key).await? {
            Some(document) => Ok(serde_json::from_str(&document)?),
            None => Err(StorageError::not_found(key)),
        }
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        debug!("Removing key {}", key);
        if self.bucket.remove(key).await? {
            Ok(())
        } else {
            Err(StorageError::not_found(key))
        }
    }
}

#[async_trait]
impl<B: Bucket> StorageBackend for BucketStorage<B> {
    async fn set_client(&self, client: &Client) -> StorageResult<()> {
        if client.id.is_empty() {
            return Err(StorageError::InvalidRecord("client id is empty"));
        }
        self.put(&client.id, client, 0).await
    }

    async fn get_client(&self, id: &str) -> StorageResult<Client> {
        self.fetch(id).await
    }

    async fn save_authorize(&self, data: &AuthorizeData) -> StorageResult<()> {
        if data.code.is_empty() {
            return Err(StorageError::InvalidRecord("authorization code is empty"));
        }
        self.put(&data.code, data, data.expires_in).await
    }

    async fn load_authorize(&self, code: &str) -> StorageResult<AuthorizeData> {
        self.fetch(code).await
    }

    async fn remove_authorize(&self, code: &str) -> StorageResult<()> {
        self.delete(code).await
    }

    async fn save_access(&self, data: &AccessData) -> StorageResult<()> {
        if data.access_token.is_empty() {
            return Err(StorageError::InvalidRecord("access token is empty"));
        }

        self.put(&access_key(&data.access_token), data, data.expires_in)
            .await?;

        if !data.has_refresh_token() {
            return Ok(());
        }

        if let Some(previous) = data.access_data.as_deref() {
            let key = refresh_key(&data.refresh_token);
            if let Err(err) = self.put(&key, previous, data.expires_in).await {
                // No rollback: the access record written above stays in place.
                warn!(
                    "Access token {} persisted without its refresh record",
                    data.access_token
                );
                return Err(err);
            }
        }

        Ok(())
    }

    async fn load_access(&self, token: &str) -> StorageResult<AccessData> {
        self.fetch(&access_key(token)).await
    }

    async fn remove_access(&self, token: &str) -> StorageResult<()> {
        self.delete(&access_key(token)).await
    }

    async fn load_refresh(&self, token: &str) -> StorageResult<AccessData> {
        self.fetch(&refresh_key(token)).await
    }

    async fn remove_refresh(&self, token: &str) -> StorageResult<()> {
        self.delete(&refresh_key(token)).await
    }

    async fn close(&self) -> StorageResult<()> {
        info!("Closing storage bucket");
        self.bucket.close().await
    }
}
