//! Search-Answer: a cache-aside web search answering service
//!
//! A query and a focus mode come in over HTTP, a chat/embedding model pair is
//! resolved, an answer agent streams back text and cited sources, and the
//! finished answer is cached so identical requests skip the agent entirely.

pub mod agent;
pub mod cache;
pub mod config;
pub mod focus_modes;
pub mod metrics;
pub mod network;
pub mod providers;
pub mod search;
pub mod searxng;
pub mod web;

pub use config::Settings;
pub use search::{SearchError, SearchOrchestrator, SearchRequest, SearchResult};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default time-to-live of cached answers in seconds
pub const DEFAULT_CACHE_TTL: u64 = 300;

/// Default namespace prefix for cache keys
pub const DEFAULT_CACHE_PREFIX: &str = "search:";
