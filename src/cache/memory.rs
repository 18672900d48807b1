//! In-process cache backend built on moka

use super::{CacheBackend, CacheError};
use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use std::time::{Duration, Instant};

/// Expiry policy reading the TTL stored alongside each value
struct PerEntryTtl;

impl Expiry<String, (String, Duration)> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &(String, Duration),
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.1)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &(String, Duration),
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.1)
    }
}

/// Cache backend keeping entries in process memory
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    cache: Cache<String, (String, Duration)>,
}

impl MemoryBackend {
    /// Create a new memory backend holding at most `max_capacity` entries
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { cache }
    }

    /// Get number of live entries
    pub fn size(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.cache.get(key).await.map(|(value, _)| value))
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.cache
            .insert(key.to_string(), (value.to_string(), ttl))
            .await;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_set_and_get() {
        let backend = MemoryBackend::new(100);
        backend
            .set_raw("k", "v", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(backend.get_raw("k").await.unwrap(), Some("v".to_string()));
        assert_eq!(backend.get_raw("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_entry_expires() {
        let backend = MemoryBackend::new(100);
        backend
            .set_raw("k", "v", Duration::from_millis(50))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(backend.get_raw("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_overwrite() {
        let backend = MemoryBackend::new(100);
        backend
            .set_raw("k", "old", Duration::from_secs(60))
            .await
            .unwrap();
        backend
            .set_raw("k", "new", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(backend.get_raw("k").await.unwrap(), Some("new".to_string()));
    }
}
