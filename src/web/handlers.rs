//! HTTP request handlers

use super::error::ApiError;
use super::state::AppState;
use crate::providers::ModelEntry;
use crate::search::{SearchRequest, SearchResult};
use crate::searxng::{SearxngResult, SearxngSearchOptions};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use futures::future::join_all;
use rand::seq::SliceRandom;
use serde_json::{json, Map, Value};
use tracing::{error, info};

/// Answer a search request, from cache when possible
pub async fn search(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResult>, ApiError> {
    let Json(request) = payload?;
    let result = state.search.search_and_respond(request).await?;
    Ok(Json(result))
}

/// Available chat and embedding models, by provider
pub async fn models(State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.search.models();

    Json(json!({
        "chatModelProviders": provider_listing(registry.chat_providers().iter()),
        "embeddingModelProviders": provider_listing(registry.embedding_providers().iter()),
    }))
}

fn provider_listing<'a, H: 'a>(
    providers: impl Iterator<Item = (&'a str, &'a [ModelEntry<H>])>,
) -> Value {
    let mut listing = Map::new();
    for (provider, models) in providers {
        let models: Map<String, Value> = models
            .iter()
            .map(|m| (m.name.clone(), json!({ "displayName": m.display_name })))
            .collect();
        listing.insert(provider.to_string(), Value::Object(models));
    }
    Value::Object(listing)
}

/// Shuffled news feed built from the configured discover queries
pub async fn discover(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let options = SearxngSearchOptions {
        engines: vec!["bing news".to_string()],
        pageno: Some(1),
        ..Default::default()
    };

    let queries = &state.settings.searxng.discover_queries;
    let responses = join_all(
        queries
            .iter()
            .map(|query| state.searxng.search(query, &options)),
    )
    .await;

    let mut blogs: Vec<SearxngResult> = Vec::new();
    for response in responses {
        match response {
            Ok(response) => blogs.extend(response.results),
            Err(e) => {
                error!("Error in discover: {}", e);
                return Err(ApiError::internal());
            }
        }
    }
    blogs.shuffle(&mut rand::thread_rng());

    info!("Discover feed: {} items from {} queries", blogs.len(), queries.len());
    Ok(Json(json!({ "blogs": blogs })))
}

/// Request and cache statistics
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "instanceName": state.instance_name(),
        "focusModes": state.search.agents().focus_modes(),
        "cache": {
            "prefix": state.search.cache().prefix(),
            "ttlSecs": state.search.cache().ttl().as_secs(),
        },
        "metrics": state.metrics.snapshot(),
    }))
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}
