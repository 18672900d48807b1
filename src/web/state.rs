//! Application state shared across handlers

use crate::agent::AgentLoader;
use crate::cache::SearchCache;
use crate::config::Settings;
use crate::focus_modes::FocusModeStore;
use crate::metrics::Metrics;
use crate::network::HttpClient;
use crate::providers::ProviderLoader;
use crate::search::SearchOrchestrator;
use crate::searxng::SearxngClient;
use std::sync::Arc;

/// Endpoint advertised for every configured focus mode
const SEARCH_ENDPOINT: &str = "/api/search";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search pipeline
    pub search: Arc<SearchOrchestrator>,
    /// SearXNG client for the discover feed
    pub searxng: SearxngClient,
    /// Focus mode catalog
    pub focus_modes: Arc<FocusModeStore>,
    /// Process metrics
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Build every component from settings
    pub fn new(settings: Settings, client: HttpClient) -> Self {
        let cache = SearchCache::from_settings(&settings.cache);
        let searxng = SearxngClient::new(client.clone(), settings.searxng.endpoint.as_str())
            .with_cache(&cache);
        let models = ProviderLoader::load(&settings, &client);
        let agents = AgentLoader::load(&settings, &searxng);
        let metrics = Arc::new(Metrics::new());

        let search = SearchOrchestrator::new(
            cache,
            Arc::new(models),
            Arc::new(agents),
            metrics.clone(),
        );

        Self::from_parts(settings, search, searxng, metrics)
    }

    /// Assemble state from prebuilt components. The focus mode catalog is
    /// seeded from the orchestrator's agents.
    pub fn from_parts(
        settings: Settings,
        search: SearchOrchestrator,
        searxng: SearxngClient,
        metrics: Arc<Metrics>,
    ) -> Self {
        let focus_modes = FocusModeStore::with_modes(
            search
                .agents()
                .focus_modes()
                .into_iter()
                .map(|mode| (mode, SEARCH_ENDPOINT)),
        );

        Self {
            settings: Arc::new(settings),
            search: Arc::new(search),
            searxng,
            focus_modes: Arc::new(focus_modes),
            metrics,
        }
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
