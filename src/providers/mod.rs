//! Model provider module
//!
//! Defines the chat and embedding model handles, the OpenAI-compatible
//! implementation, and the registry that resolves a request's model
//! selection to concrete handles.

mod loader;
mod openai;
mod registry;

pub use loader::ProviderLoader;
pub use openai::{OpenAiChatModel, OpenAiEmbeddings};
pub use registry::*;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::pin::Pin;
use thiserror::Error;

/// Errors raised while talking to a model provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Request(String),

    #[error("unexpected provider response: {0}")]
    Decode(String),

    #[error("provider stream failed: {0}")]
    Stream(String),
}

impl From<anyhow::Error> for ProviderError {
    fn from(err: anyhow::Error) -> Self {
        Self::Request(err.to_string())
    }
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Stream of generated text deltas
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send>>;

/// A chat model ready to generate
#[async_trait]
pub trait ChatModel: Send + Sync + Debug {
    /// Start a streaming completion for the given conversation
    async fn stream(&self, messages: Vec<ChatMessage>) -> Result<ChatStream, ProviderError>;

    /// Upstream model id
    fn model_name(&self) -> &str;
}

/// An embeddings model ready to embed
#[async_trait]
pub trait EmbeddingModel: Send + Sync + Debug {
    /// Embed every text, returning vectors in input order
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;

    /// Upstream model id
    fn model_name(&self) -> &str;
}
