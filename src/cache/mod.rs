//! Caching module for Search-Answer
//!
//! Answers are cached cache-aside: callers look up before computing and
//! write after computing. The cache is never a source of truth, so every
//! backend failure is logged here and degrades to a miss (reads) or a no-op
//! (writes). Callers of [`SearchCache`] never see a cache error.

mod key;
mod memory;
mod redis;

pub use key::{canonical_json, CacheKey};
pub use memory::MemoryBackend;
pub use self::redis::RedisBackend;

use crate::config::{CacheBackendKind, CacheSettings};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors raised by cache backends
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    Connection(String),

    #[error("cache command failed: {0}")]
    Command(String),

    #[error("cache operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Raw string key-value storage with per-entry TTL
#[async_trait]
pub trait CacheBackend: Send + Sync + Debug {
    /// Get a stored value, `None` if absent or expired
    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a value, replacing any previous one, expiring after `ttl`
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Best-effort, namespaced cache for search results
#[derive(Debug, Clone)]
pub struct SearchCache {
    backend: Arc<dyn CacheBackend>,
    prefix: String,
    ttl: Duration,
}

impl SearchCache {
    /// Create a cache over an existing backend
    pub fn new(backend: Arc<dyn CacheBackend>, prefix: impl Into<String>, ttl: Duration) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
            ttl,
        }
    }

    /// Build the configured backend.
    ///
    /// An unusable Redis URL falls back to the in-memory backend so the
    /// service still starts; nothing else about the cache can fail here.
    pub fn from_settings(settings: &CacheSettings) -> Self {
        let ttl = Duration::from_secs(settings.ttl);
        let backend: Arc<dyn CacheBackend> = match settings.backend {
            CacheBackendKind::Redis => {
                let op_timeout = Duration::from_millis(settings.operation_timeout_ms);
                match RedisBackend::new(&settings.url, op_timeout) {
                    Ok(backend) => Arc::new(backend),
                    Err(e) => {
                        error!("Redis cache unavailable, using in-memory cache: {}", e);
                        Arc::new(MemoryBackend::new(settings.max_capacity))
                    }
                }
            }
            CacheBackendKind::Memory => Arc::new(MemoryBackend::new(settings.max_capacity)),
        };

        info!(
            backend = backend.name(),
            prefix = %settings.prefix,
            ttl_secs = settings.ttl,
            "Cache initialized"
        );

        Self::new(backend, settings.prefix.clone(), ttl)
    }

    /// In-memory cache with the default prefix, mostly for tests
    pub fn in_memory(ttl: Duration) -> Self {
        Self::new(
            Arc::new(MemoryBackend::default()),
            crate::DEFAULT_CACHE_PREFIX,
            ttl,
        )
    }

    /// Same backend and TTL under a different key prefix
    pub fn namespaced(&self, prefix: impl Into<String>) -> Self {
        Self::new(self.backend.clone(), prefix, self.ttl)
    }

    /// Build the namespaced key for a query and options
    pub fn key(&self, query: &str, options: Option<&Value>) -> CacheKey {
        CacheKey::new(&self.prefix, query, options)
    }

    /// Look up a cached value. Any failure is logged and reported as a miss.
    pub async fn get<T: DeserializeOwned>(&self, query: &str, options: Option<&Value>) -> Option<T> {
        let key = self.key(query, options);

        let raw = match self.backend.get_raw(key.as_str()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("Cache miss for query: {}", query);
                return None;
            }
            Err(e) => {
                error!(backend = self.backend.name(), "Cache get error: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                info!("Cache hit for query: {}", query);
                Some(value)
            }
            Err(e) => {
                warn!(key = %key, "Ignoring malformed cache entry: {}", e);
                None
            }
        }
    }

    /// Store a value with the configured TTL. Failures are logged and dropped.
    pub async fn set<T: Serialize + ?Sized>(&self, query: &str, options: Option<&Value>, value: &T) {
        let key = self.key(query, options);

        let data = match serde_json::to_string(value) {
            Ok(data) => data,
            Err(e) => {
                error!(key = %key, "Cache set error: {}", CacheError::from(e));
                return;
            }
        };

        match self.backend.set_raw(key.as_str(), &data, self.ttl).await {
            Ok(()) => {
                info!("Cached result for query: {}", query);
                debug!(key = %key, bytes = data.len(), "Cache entry written");
            }
            Err(e) => error!(backend = self.backend.name(), "Cache set error: {}", e),
        }
    }

    /// Configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Configured key prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}
