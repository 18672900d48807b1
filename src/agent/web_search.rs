//! Retrieval-augmented answer agent backed by SearXNG

use super::{AgentError, AgentEvents, AgentRequest, EventSender, SearchAgent};
use crate::config::AgentConfig;
use crate::providers::{ChatMessage, EmbeddingModel};
use crate::search::{OptimizationMode, Source};
use crate::searxng::{SearxngClient, SearxngResult, SearxngSearchOptions};
use async_trait::async_trait;
use futures::StreamExt;
use tracing::{debug, warn};

const SEARCH_PROMPT: &str = "You are an answer engine. Answer the user's query using the \
numbered search results in the context below. Cite the results you use inline as [n], \
matching their numbers. If the context does not answer the query, say so instead of guessing.";

const WRITING_PROMPT: &str = "You are a writing assistant. Help the user with their request \
directly; you do not have access to web search results.";

/// Agent that searches the web and streams a cited answer
#[derive(Debug, Clone)]
pub struct WebSearchAgent {
    config: AgentConfig,
    searxng: SearxngClient,
}

impl WebSearchAgent {
    pub fn new(config: AgentConfig, searxng: SearxngClient) -> Self {
        Self { config, searxng }
    }

    async fn run(&self, request: AgentRequest, tx: &EventSender) -> Result<(), AgentError> {
        if !request.file_ids.is_empty() {
            debug!("Ignoring {} attached files", request.file_ids.len());
        }

        let sources = if self.config.search_web {
            let sources = self.retrieve(&request).await?;
            if !tx.sources(sources.clone()).await {
                return Ok(());
            }
            sources
        } else {
            vec![]
        };

        let messages = self.build_messages(&request, &sources);
        let mut stream = request.chat_model.stream(messages).await?;
        while let Some(delta) = stream.next().await {
            if !tx.response(delta?).await {
                debug!("Consumer went away, stopping generation");
                break;
            }
        }

        Ok(())
    }

    /// Search, optionally rerank, and cap the result list
    async fn retrieve(&self, request: &AgentRequest) -> Result<Vec<Source>, AgentError> {
        let options = SearxngSearchOptions::with_engines(&self.config.engines);
        let response = self
            .searxng
            .search(&request.query, &options)
            .await
            .map_err(|e| AgentError::Retrieval(e.to_string()))?;

        let mut results: Vec<SearxngResult> = response
            .results
            .into_iter()
            .filter(|r| !r.url.is_empty())
            .collect();

        if request.optimization_mode == OptimizationMode::Balanced && results.len() > 1 {
            results = rerank(&request.query, results, request.embeddings.as_ref()).await?;
        }
        results.truncate(self.config.max_sources);

        Ok(results
            .into_iter()
            .map(|r| Source {
                extra: r.to_source_fields(),
                title: r.title,
                url: r.url,
            })
            .collect())
    }

    fn build_messages(&self, request: &AgentRequest, sources: &[Source]) -> Vec<ChatMessage> {
        let mut prompt = if self.config.search_web {
            SEARCH_PROMPT.to_string()
        } else {
            WRITING_PROMPT.to_string()
        };

        if let Some(ref instructions) = self.config.instructions {
            prompt.push_str("\n\n");
            prompt.push_str(instructions);
        }

        if self.config.search_web {
            prompt.push_str("\n\n<context>\n");
            for (i, source) in sources.iter().enumerate() {
                let snippet = source
                    .extra
                    .get("content")
                    .and_then(|c| c.as_str())
                    .unwrap_or_default();
                prompt.push_str(&format!("{}. {} ({})\n{}\n\n", i + 1, source.title, source.url, snippet));
            }
            prompt.push_str("</context>");
        }

        let mut messages = Vec::with_capacity(request.history.len() + 2);
        messages.push(ChatMessage::system(prompt));
        messages.extend(request.history.iter().cloned());
        messages.push(ChatMessage::user(request.query.as_str()));
        messages
    }
}

#[async_trait]
impl SearchAgent for WebSearchAgent {
    async fn search_and_answer(&self, request: AgentRequest) -> Result<AgentEvents, AgentError> {
        let (tx, events) = AgentEvents::channel();
        let agent = self.clone();

        tokio::spawn(async move {
            let outcome = agent.run(request, &tx).await;
            match outcome {
                Ok(()) => tx.end().await,
                Err(e) => {
                    warn!(focus_mode = %agent.config.focus_mode, "Agent failed: {}", e);
                    tx.error(e.to_string()).await;
                }
            }
        });

        Ok(events)
    }

    fn focus_mode(&self) -> &str {
        &self.config.focus_mode
    }
}

/// Order results by embedding similarity to the query, most similar first
async fn rerank(
    query: &str,
    results: Vec<SearxngResult>,
    embeddings: &dyn EmbeddingModel,
) -> Result<Vec<SearxngResult>, AgentError> {
    let mut texts = Vec::with_capacity(results.len() + 1);
    texts.push(query.to_string());
    texts.extend(
        results
            .iter()
            .map(|r| r.content.clone().unwrap_or_else(|| r.title.clone())),
    );

    let vectors = embeddings.embed(&texts).await?;
    let Some((query_vec, doc_vecs)) = vectors.split_first() else {
        return Ok(results);
    };

    let mut scored: Vec<(f32, SearxngResult)> = doc_vecs
        .iter()
        .map(|v| cosine_similarity(query_vec, v))
        .zip(results)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    Ok(scored.into_iter().map(|(_, r)| r).collect())
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
