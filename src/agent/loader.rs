//! Agent loader for initializing agents from configuration

use super::{AgentRegistry, WebSearchAgent};
use crate::config::Settings;
use crate::searxng::SearxngClient;
use std::sync::Arc;
use tracing::{info, warn};

/// Loader for initializing agents from configuration
pub struct AgentLoader;

impl AgentLoader {
    /// Build one web-search agent per configured focus mode
    pub fn load(settings: &Settings, searxng: &SearxngClient) -> AgentRegistry {
        let mut registry = AgentRegistry::new();

        for config in &settings.agents {
            if config.focus_mode.is_empty() {
                warn!("Skipping agent with empty focus mode");
                continue;
            }
            if registry.contains(&config.focus_mode) {
                warn!("Duplicate agent for focus mode {}, later one wins", config.focus_mode);
            }

            info!(
                "Loaded agent: {} (web: {}, engines: {:?})",
                config.focus_mode, config.search_web, config.engines
            );
            registry.register(Arc::new(WebSearchAgent::new(config.clone(), searxng.clone())));
        }

        info!("Loaded {} agents", registry.len());
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentConfig;
    use crate::network::HttpClient;

    #[test]
    fn test_load_default_agents() {
        let settings = Settings::default();
        let searxng = SearxngClient::new(HttpClient::new().unwrap(), "http://localhost:8080");

        let registry = AgentLoader::load(&settings, &searxng);
        assert_eq!(registry.len(), settings.agents.len());
        assert!(registry.contains("webSearch"));
        assert!(registry.contains("writingAssistant"));
    }

    #[test]
    fn test_empty_focus_mode_skipped() {
        let settings = Settings {
            agents: vec![
                AgentConfig::default(),
                AgentConfig {
                    focus_mode: "newsSearch".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let searxng = SearxngClient::new(HttpClient::new().unwrap(), "http://localhost:8080");

        let registry = AgentLoader::load(&settings, &searxng);
        assert_eq!(registry.focus_modes(), vec!["newsSearch"]);
    }
}
