//! SearXNG metasearch client
//!
//! Retrieval for the web-search agents and the discover feed. Responses
//! are cached under their own key namespace, keyed by query and options.

use crate::cache::SearchCache;
use crate::network::HttpClient;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Key prefix for cached SearXNG responses
pub const SEARXNG_CACHE_PREFIX: &str = "searxng:";

/// Optional SearXNG query parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearxngSearchOptions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub engines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pageno: Option<u32>,
}

impl SearxngSearchOptions {
    pub fn with_engines<S: AsRef<str>>(engines: &[S]) -> Self {
        Self {
            engines: engines.iter().map(|e| e.as_ref().to_string()).collect(),
            ..Default::default()
        }
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Query-string form; list options are comma-joined
    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.categories.is_empty() {
            params.push(("categories", self.categories.join(",")));
        }
        if !self.engines.is_empty() {
            params.push(("engines", self.engines.join(",")));
        }
        if let Some(ref language) = self.language {
            params.push(("language", language.clone()));
        }
        if let Some(pageno) = self.pageno {
            params.push(("pageno", pageno.to_string()));
        }
        params
    }
}

/// One SearXNG result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearxngResult {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iframe_src: Option<String>,
}

/// Results and suggestions for one query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearxngResponse {
    #[serde(default)]
    pub results: Vec<SearxngResult>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Client for a SearXNG instance's JSON API
#[derive(Debug, Clone)]
pub struct SearxngClient {
    client: HttpClient,
    endpoint: String,
    cache: Option<SearchCache>,
}

impl SearxngClient {
    pub fn new(client: HttpClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            cache: None,
        }
    }

    /// Cache responses in the given store under [`SEARXNG_CACHE_PREFIX`]
    pub fn with_cache(mut self, cache: &SearchCache) -> Self {
        self.cache = Some(cache.namespaced(SEARXNG_CACHE_PREFIX));
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run a query, serving from cache when possible
    pub async fn search(&self, query: &str, options: &SearxngSearchOptions) -> Result<SearxngResponse> {
        let cache_options = if options.is_empty() {
            None
        } else {
            Some(serde_json::to_value(options)?)
        };

        if let Some(ref cache) = self.cache {
            if let Some(hit) = cache.get(query, cache_options.as_ref()).await {
                return Ok(hit);
            }
        }

        let mut params = vec![("format", "json".to_string()), ("q", query.to_string())];
        params.extend(options.to_params());

        debug!("SearXNG query: {} {:?}", query, options);
        let response: SearxngResponse = self
            .client
            .get_json(&format!("{}/search", self.endpoint), &params)
            .await?;

        if let Some(ref cache) = self.cache {
            cache.set(query, cache_options.as_ref(), &response).await;
        }

        Ok(response)
    }
}

impl SearxngResult {
    /// Source metadata attached to an answer
    pub fn to_source_fields(&self) -> Map<String, Value> {
        let mut extra = Map::new();
        if let Some(ref content) = self.content {
            extra.insert("content".to_string(), Value::String(content.clone()));
        }
        if let Some(thumbnail) = self.thumbnail_src.as_ref().or(self.thumbnail.as_ref()) {
            extra.insert("thumbnail".to_string(), Value::String(thumbnail.clone()));
        }
        if let Some(ref author) = self.author {
            extra.insert("author".to_string(), Value::String(author.clone()));
        }
        extra
    }
}
