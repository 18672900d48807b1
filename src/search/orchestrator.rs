//! Cache-aside search pipeline

use super::aggregate::Aggregator;
use super::error::SearchError;
use super::models::{OptimizationMode, SearchRequest, SearchResult};
use crate::agent::{AgentRegistry, AgentRequest, SearchAgent};
use crate::cache::SearchCache;
use crate::metrics::Metrics;
use crate::providers::ModelRegistry;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Answers search requests from the cache or by running the focus mode's
/// agent, caching every successful answer.
#[derive(Debug, Clone)]
pub struct SearchOrchestrator {
    cache: SearchCache,
    models: Arc<ModelRegistry>,
    agents: Arc<AgentRegistry>,
    metrics: Arc<Metrics>,
}

impl SearchOrchestrator {
    pub fn new(
        cache: SearchCache,
        models: Arc<ModelRegistry>,
        agents: Arc<AgentRegistry>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            cache,
            models,
            agents,
            metrics,
        }
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    pub fn agents(&self) -> &AgentRegistry {
        &self.agents
    }

    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }

    /// Handle one search request
    pub async fn search_and_respond(&self, request: SearchRequest) -> Result<SearchResult, SearchError> {
        self.metrics.inc_search();

        let outcome = self.run(request).await;
        if let Err(ref e) = outcome {
            if e.is_client_error() {
                self.metrics.record_client_error();
                debug!("Rejected search request: {}", e);
            }
        }
        outcome
    }

    async fn run(&self, request: SearchRequest) -> Result<SearchResult, SearchError> {
        let query = request.query.as_deref().filter(|q| !q.is_empty());
        let focus_mode = request.focus_mode.as_deref().filter(|f| !f.is_empty());
        let (Some(query), Some(focus_mode)) = (query, focus_mode) else {
            return Err(SearchError::MissingInput);
        };

        let mode = request.optimization_mode();
        let options = cache_options(focus_mode, mode);

        if let Some(hit) = self.cache.get::<SearchResult>(query, Some(&options)).await {
            self.metrics.record_cache_hit();
            return Ok(hit);
        }
        self.metrics.record_cache_miss();

        let chat_model = self.models.resolve_chat(request.chat_model.as_ref())?;
        let embeddings = self
            .models
            .resolve_embeddings(request.embedding_model.as_ref())?;

        let agent = self
            .agents
            .get(focus_mode)
            .ok_or(SearchError::InvalidFocusMode)?;

        let agent_request = AgentRequest {
            query: query.to_string(),
            history: request.history_messages(),
            chat_model,
            embeddings,
            optimization_mode: mode,
            file_ids: vec![],
        };

        info!(
            focus_mode,
            optimization_mode = %mode,
            model = agent_request.chat_model.model_name(),
            "Running agent for query: {}",
            query
        );
        self.metrics.record_agent_run(focus_mode);
        let started = Instant::now();
        let outcome = self.collect(agent.as_ref(), agent_request).await;
        self.metrics
            .record_response_time(focus_mode, started.elapsed().as_millis() as u64);

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                self.metrics.record_agent_failure(focus_mode);
                return Err(e);
            }
        };
        self.metrics.record_agent_success(focus_mode);

        self.cache.set(query, Some(&options), &result).await;
        Ok(result)
    }

    /// Run the agent and fold its events into one answer
    async fn collect(
        &self,
        agent: &dyn SearchAgent,
        request: AgentRequest,
    ) -> Result<SearchResult, SearchError> {
        let mut events = agent.search_and_answer(request).await.map_err(|e| {
            error!(focus_mode = agent.focus_mode(), "Failed to start agent: {}", e);
            SearchError::Internal(e.into())
        })?;

        let mut aggregator = Aggregator::new();
        while let Some(event) = events.recv().await {
            if aggregator.apply(event) {
                break;
            }
        }

        aggregator.finish().map_err(|message| {
            warn!(focus_mode = agent.focus_mode(), "Agent reported error: {}", message);
            SearchError::Agent(message)
        })
    }
}

/// Options that, with the query, identify a cached answer.
///
/// Keyed on the effective mode, so an omitted mode and an explicit
/// `balanced` share an entry. Keying on the raw request value would give
/// the omitted mode an entry of its own.
fn cache_options(focus_mode: &str, mode: OptimizationMode) -> Value {
    json!({
        "focusMode": focus_mode,
        "optimizationMode": mode,
    })
}
