//! Settings structures for Search-Answer configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub cache: CacheSettings,
    pub providers: Vec<ProviderConfig>,
    pub searxng: SearxngSettings,
    pub agents: Vec<AgentConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            server: ServerSettings::default(),
            outgoing: OutgoingSettings::default(),
            cache: CacheSettings::default(),
            providers: default_providers(),
            searxng: SearxngSettings::default(),
            agents: default_agents(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("SEARCH_ANSWER_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("SEARCH_ANSWER_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("SEARCH_ANSWER_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("REDIS_URL") {
            self.cache.url = val;
        }
        if let Ok(val) = std::env::var("CACHE_TTL") {
            if let Ok(ttl) = val.parse() {
                self.cache.ttl = ttl;
            }
        }
        if let Ok(val) = std::env::var("SEARXNG_API_URL") {
            self.searxng.endpoint = val;
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            // Only fills providers that did not configure their own key
            for provider in self.providers.iter_mut().filter(|p| p.api_key.is_none()) {
                provider.api_key = Some(key.clone());
            }
        }
    }

    /// Check that configured URLs parse
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.searxng.endpoint)
            .map_err(|e| anyhow::anyhow!("invalid searxng.endpoint {:?}: {}", self.searxng.endpoint, e))?;
        for provider in &self.providers {
            url::Url::parse(&provider.base_url).map_err(|e| {
                anyhow::anyhow!("invalid base_url for provider {}: {}", provider.name, e)
            })?;
        }
        Ok(())
    }

    /// Get agent config by focus mode
    pub fn get_agent(&self, focus_mode: &str) -> Option<&AgentConfig> {
        self.agents.iter().find(|a| a.focus_mode == focus_mode)
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name reported by the health endpoint
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "Search-Answer".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 3001,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Pool max idle connections per host
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy for all outgoing requests
    pub proxy: Option<String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 60.0,
            pool_maxsize: 20,
            verify_ssl: true,
            proxy: None,
        }
    }
}

/// Which store backs the answer cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackendKind {
    #[default]
    Redis,
    Memory,
}

/// Cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Backing store
    pub backend: CacheBackendKind,
    /// Redis connection URL
    pub url: String,
    /// Namespace prefix prepended to every key
    pub prefix: String,
    /// Entry time-to-live in seconds
    pub ttl: u64,
    /// Max entries for the in-memory backend
    pub max_capacity: u64,
    /// Upper bound for a single backend round-trip in milliseconds
    pub operation_timeout_ms: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::Redis,
            url: "redis://127.0.0.1:6379".to_string(),
            prefix: crate::DEFAULT_CACHE_PREFIX.to_string(),
            ttl: crate::DEFAULT_CACHE_TTL,
            max_capacity: 10_000,
            operation_timeout_ms: 2_000,
        }
    }
}

/// An OpenAI-compatible model provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider name used in requests (e.g. "openai")
    pub name: String,
    /// API base URL, including the version segment
    pub base_url: String,
    /// API key; providers without one are not loaded
    pub api_key: Option<String>,
    /// Sampling temperature for chat models
    pub temperature: f32,
    /// Chat models in registration order
    pub chat_models: Vec<ModelConfig>,
    /// Embedding models in registration order
    pub embedding_models: Vec<ModelConfig>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            temperature: 0.7,
            chat_models: vec![],
            embedding_models: vec![],
        }
    }
}

/// A single model entry of a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Key clients select the model by
    pub name: String,
    /// Human readable name
    #[serde(default)]
    pub display_name: Option<String>,
    /// Model id sent upstream, defaults to `name`
    #[serde(default)]
    pub model: Option<String>,
}

impl ModelConfig {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: Some(display_name.into()),
            model: None,
        }
    }

    /// Model id to send to the provider
    pub fn upstream_model(&self) -> &str {
        self.model.as_deref().unwrap_or(&self.name)
    }

    /// Name to show in listings
    pub fn display(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// SearXNG settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearxngSettings {
    /// Base URL of the SearXNG instance
    pub endpoint: String,
    /// News queries merged into the discover feed
    pub discover_queries: Vec<String>,
}

impl Default for SearxngSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080".to_string(),
            discover_queries: [
                "site:businessinsider.com AI",
                "site:www.exchangewire.com AI",
                "site:yahoo.com AI",
                "site:businessinsider.com tech",
                "site:www.exchangewire.com tech",
                "site:yahoo.com tech",
            ]
            .iter()
            .map(|q| q.to_string())
            .collect(),
        }
    }
}

/// Answer agent bound to a focus mode
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Focus mode this agent answers for
    pub focus_mode: String,
    /// Whether to query the web before answering
    pub search_web: bool,
    /// SearXNG engines to restrict retrieval to (empty = instance default)
    pub engines: Vec<String>,
    /// Maximum number of sources handed to the model
    pub max_sources: usize,
    /// Extra instruction appended to the system prompt
    pub instructions: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            focus_mode: String::new(),
            search_web: true,
            engines: vec![],
            max_sources: 15,
            instructions: None,
        }
    }
}

impl AgentConfig {
    fn web(focus_mode: &str, engines: &[&str]) -> Self {
        Self {
            focus_mode: focus_mode.to_string(),
            engines: engines.iter().map(|e| e.to_string()).collect(),
            ..Default::default()
        }
    }
}

/// Default provider configurations
fn default_providers() -> Vec<ProviderConfig> {
    vec![ProviderConfig {
        name: "openai".to_string(),
        chat_models: vec![
            ModelConfig::new("gpt-3.5-turbo", "GPT-3.5 Turbo"),
            ModelConfig::new("gpt-4", "GPT-4"),
            ModelConfig::new("gpt-4-turbo", "GPT-4 turbo"),
            ModelConfig::new("gpt-4o", "GPT-4 omni"),
            ModelConfig::new("gpt-4o-mini", "GPT-4 omni mini"),
        ],
        embedding_models: vec![
            ModelConfig::new("text-embedding-3-small", "Text Embedding 3 Small"),
            ModelConfig::new("text-embedding-3-large", "Text Embedding 3 Large"),
        ],
        ..Default::default()
    }]
}

/// Default focus modes
fn default_agents() -> Vec<AgentConfig> {
    vec![
        AgentConfig::web("webSearch", &[]),
        AgentConfig::web("academicSearch", &["arxiv", "google scholar", "pubmed"]),
        AgentConfig::web("youtubeSearch", &["youtube"]),
        AgentConfig::web("redditSearch", &["reddit"]),
        AgentConfig::web("wolframAlphaSearch", &["wolframalpha"]),
        AgentConfig {
            focus_mode: "writingAssistant".to_string(),
            search_web: false,
            ..Default::default()
        },
    ]
}
