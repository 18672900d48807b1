//! Redis cache backend

use super::{CacheBackend, CacheError};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio::time::timeout;
use tracing::info;

/// Redis-backed cache storage.
///
/// The connection is established on first use and shared by every request
/// through a multiplexed `ConnectionManager`. If the server is unreachable the
/// connect is retried on the next call instead of failing startup.
pub struct RedisBackend {
    client: Client,
    connection: OnceCell<ConnectionManager>,
    op_timeout: Duration,
}

impl fmt::Debug for RedisBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisBackend")
            .field("connected", &self.connection.initialized())
            .field("op_timeout", &self.op_timeout)
            .finish()
    }
}

impl RedisBackend {
    /// Create a backend for the given URL. Does not connect yet.
    pub fn new(url: &str, op_timeout: Duration) -> Result<Self, CacheError> {
        let client = Client::open(url)
            .map_err(|e| CacheError::Connection(format!("invalid Redis URL: {}", e)))?;

        Ok(Self {
            client,
            connection: OnceCell::new(),
            op_timeout,
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, CacheError> {
        let conn = self
            .bounded(self.connection.get_or_try_init(|| async {
                let manager = ConnectionManager::new(self.client.clone())
                    .await
                    .map_err(|e| CacheError::Connection(e.to_string()))?;
                info!("Redis client connected");
                Ok::<_, CacheError>(manager)
            }))
            .await??;

        Ok(conn.clone())
    }

    async fn bounded<F: Future>(&self, fut: F) -> Result<F::Output, CacheError> {
        timeout(self.op_timeout, fut)
            .await
            .map_err(|_| CacheError::Timeout(self.op_timeout))
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection().await?;

        self.bounded(conn.get::<_, Option<String>>(key))
            .await?
            .map_err(|e| CacheError::Command(format!("GET '{}': {}", key, e)))
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let ttl_secs = ttl.as_secs().max(1);

        self.bounded(conn.set_ex::<_, _, ()>(key, value, ttl_secs))
            .await?
            .map_err(|e| CacheError::Command(format!("SETEX '{}': {}", key, e)))
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These tests require a running Redis instance:
    // cargo test -- --ignored

    fn backend() -> RedisBackend {
        RedisBackend::new("redis://127.0.0.1:6379", Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(RedisBackend::new("not a url", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_an_error_not_a_hang() {
        let backend = RedisBackend::new("redis://127.0.0.1:1", Duration::from_millis(500)).unwrap();
        assert!(backend.get_raw("k").await.is_err());
        assert!(backend
            .set_raw("k", "v", Duration::from_secs(1))
            .await
            .is_err());
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_set_and_get() {
        let backend = backend();
        backend
            .set_raw("search-answer-test:k", "v", Duration::from_secs(60))
            .await
            .unwrap();

        let value = backend.get_raw("search-answer-test:k").await.unwrap();
        assert_eq!(value, Some("v".to_string()));
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_entry_expires() {
        let backend = backend();
        backend
            .set_raw("search-answer-test:ttl", "v", Duration::from_secs(1))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(backend.get_raw("search-answer-test:ttl").await.unwrap(), None);
    }
}
