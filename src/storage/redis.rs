use super::Bucket;
use crate::config::StorageConfig;
use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use log::{debug, info};
use redis::aio::ConnectionManager;
use redis::{Client, IntoConnectionInfo};

/// Redis-backed bucket. Every key is namespaced as `{bucket}:{key}`.
///
/// Holds a multiplexed `ConnectionManager`; each operation works on a clone of
/// it, so no locking is needed and reconnects are handled by the driver.
#[derive(Clone)]
pub struct RedisBucket {
    name: String,
    manager: ConnectionManager,
}

impl RedisBucket {
    /// Validates `config`, connects and checks the bucket is reachable.
    pub async fn open(config: &StorageConfig) -> StorageResult<Self> {
        config.validate()?;

        let mut conn_info = config
            .connection_string
            .as_str()
            .into_connection_info()
            .map_err(StorageError::Connection)?;
        if !config.bucket_password.is_empty() {
            conn_info.redis.password = Some(config.bucket_password.clone());
        }

        info!(
            "Opening bucket {} at {}",
            config.bucket_name, config.connection_string
        );
        let client = Client::open(conn_info).map_err(StorageError::Connection)?;

        // Fail fast on an unreachable store or rejected credentials before
        // handing the client to the reconnecting manager.
        let mut ping_conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(StorageError::Connection)?;
        redis::cmd("PING")
            .query_async::<_, String>(&mut ping_conn)
            .await
            .map_err(StorageError::Connection)?;

        let manager = client
            .get_connection_manager()
            .await
            .map_err(StorageError::Connection)?;

        Ok(RedisBucket {
            name: config.bucket_name.clone(),
            manager,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn namespaced(&self, key: &str) -> String {
        namespaced_key(&self.name, key)
    }
}

fn namespaced_key(bucket: &str, key: &str) -> String {
    format!("{}:{}", bucket, key)
}

#[async_trait]
impl Bucket for RedisBucket {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let mut conn = self.manager.clone();
        let document: Option<String> = redis::cmd("GET")
            .arg(self.namespaced(key))
            .query_async(&mut conn)
            .await?;
        Ok(document)
    }

    async fn upsert(&self, key: &str, document: String, ttl_secs: u32) -> StorageResult<()> {
        let mut conn = self.manager.clone();
        let mut cmd = redis::cmd("SET");
        cmd.arg(self.namespaced(key)).arg(document);
        if ttl_secs > 0 {
            cmd.arg("EX").arg(ttl_secs);
        }
        cmd.query_async::<_, ()>(&mut conn).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<bool> {
        let mut conn = self.manager.clone();
        let removed: usize = redis::cmd("DEL")
            .arg(self.namespaced(key))
            .query_async(&mut conn)
            .await?;
        Ok(removed > 0)
    }

    async fn close(&self) -> StorageResult<()> {
        // The manager closes its connection once the last clone is dropped.
        debug!("Releasing bucket {}", self.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_namespaced_by_bucket() {
        assert_eq!(namespaced_key("oauth", "client_id"), "oauth:client_id");
        assert_eq!(namespaced_key("oauth", "a_token"), "oauth:a_token");
        assert_ne!(
            namespaced_key("one", "r_token"),
            namespaced_key("two", "r_token")
        );
    }

    #[tokio::test]
    async fn test_open_rejects_incomplete_config() {
        let cases = vec![
            (
                StorageConfig::new("", "something", ""),
                "empty connection string provided",
            ),
            (
                StorageConfig::new("something", "", ""),
                "empty bucket name provided",
            ),
        ];

        for (config, expected) in cases {
            let err = RedisBucket::open(&config).await.err().unwrap();
            assert!(matches!(err, StorageError::Config(_)));
            assert_eq!(err.to_string(), expected);
        }
    }

    #[tokio::test]
    async fn test_open_reports_unreachable_store() {
        let config = StorageConfig::new("redis://127.0.0.1:1/", "oauth", "");
        let err = RedisBucket::open(&config).await.err().unwrap();
        assert!(matches!(err, StorageError::Connection(_)));
    }

    #[tokio::test]
    async fn test_open_reports_malformed_connection_string() {
        let config = StorageConfig::new("not a url", "oauth", "");
        let err = RedisBucket::open(&config).await.err().unwrap();
        assert!(matches!(err, StorageError::Connection(_)));
    }
}
