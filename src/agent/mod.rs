//! Answer agents
//!
//! An agent turns a query into a stream of [`AgentEvent`]s: response
//! fragments, a source list, and a single terminal `End` or `Error`.
//! Invocation returns the consumer half immediately; the work runs on a
//! spawned task.

mod events;
mod loader;
mod registry;
mod web_search;

pub use events::{AgentEvent, AgentEvents, AgentPayload, EventSender};
pub use loader::AgentLoader;
pub use registry::AgentRegistry;
pub use web_search::WebSearchAgent;

use crate::providers::{ChatMessage, ChatModel, EmbeddingModel, ProviderError};
use crate::search::OptimizationMode;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by agents
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("retrieval failed: {0}")]
    Retrieval(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("invalid agent event: {0}")]
    Protocol(String),
}

/// Everything an agent needs to answer one query
#[derive(Debug, Clone)]
pub struct AgentRequest {
    pub query: String,
    pub history: Vec<ChatMessage>,
    pub chat_model: Arc<dyn ChatModel>,
    pub embeddings: Arc<dyn EmbeddingModel>,
    pub optimization_mode: OptimizationMode,
    /// Attached file ids; always empty for the search endpoint
    pub file_ids: Vec<String>,
}

/// An answer agent bound to a focus mode
#[async_trait]
pub trait SearchAgent: Send + Sync + Debug {
    /// Start answering. Returns once the event stream is ready, before
    /// any event has been produced.
    async fn search_and_answer(&self, request: AgentRequest) -> Result<AgentEvents, AgentError>;

    /// Focus mode this agent serves
    fn focus_mode(&self) -> &str;
}
