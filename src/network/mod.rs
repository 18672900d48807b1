//! HTTP networking module
//!
//! Provides the HTTP client used to reach model providers and SearXNG.

mod client;

pub use client::HttpClient;
