//! Model registry and request-time model resolution

use super::{ChatModel, EmbeddingModel, OpenAiChatModel};
use crate::network::HttpClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Provider name that builds a chat model from request-supplied credentials
pub const CUSTOM_OPENAI_PROVIDER: &str = "custom_openai";

/// Temperature used for ad hoc custom OpenAI models
const CUSTOM_OPENAI_TEMPERATURE: f32 = 0.7;

/// Reasons a request's model selection cannot be satisfied
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Missing custom OpenAI base URL or key")]
    MissingCustomCredentials,

    #[error("Invalid model selected")]
    InvalidModel,
}

/// Chat model requested by a client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatModelSelection {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, rename = "customOpenAIBaseURL")]
    pub custom_openai_base_url: Option<String>,
    #[serde(default, rename = "customOpenAIKey")]
    pub custom_openai_key: Option<String>,
}

/// Embedding model requested by a client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingModelSelection {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// A registered model
#[derive(Debug, Clone)]
pub struct ModelEntry<H> {
    pub name: String,
    pub display_name: String,
    pub handle: H,
}

/// Ordered provider -> model -> handle mapping.
///
/// Iteration follows registration order so "first provider" and "first
/// model" are well defined.
#[derive(Debug, Clone)]
pub struct ProviderMap<H> {
    providers: Vec<(String, Vec<ModelEntry<H>>)>,
}

impl<H> Default for ProviderMap<H> {
    fn default() -> Self {
        Self { providers: vec![] }
    }
}

impl<H> ProviderMap<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model, replacing an existing one with the same name
    pub fn insert(
        &mut self,
        provider: impl Into<String>,
        name: impl Into<String>,
        display_name: impl Into<String>,
        handle: H,
    ) {
        let provider = provider.into();
        let entry = ModelEntry {
            name: name.into(),
            display_name: display_name.into(),
            handle,
        };

        let idx = match self.providers.iter().position(|(p, _)| *p == provider) {
            Some(idx) => idx,
            None => {
                self.providers.push((provider, vec![]));
                self.providers.len() - 1
            }
        };
        let models = &mut self.providers[idx].1;

        match models.iter_mut().find(|m| m.name == entry.name) {
            Some(existing) => *existing = entry,
            None => models.push(entry),
        }
    }

    /// Look up a model handle
    pub fn get(&self, provider: &str, model: &str) -> Option<&H> {
        self.models(provider)?
            .iter()
            .find(|m| m.name == model)
            .map(|m| &m.handle)
    }

    /// Models of a provider in registration order
    pub fn models(&self, provider: &str) -> Option<&[ModelEntry<H>]> {
        self.providers
            .iter()
            .find(|(p, _)| p == provider)
            .map(|(_, models)| models.as_slice())
    }

    /// Name of the first registered provider
    pub fn first_provider(&self) -> Option<&str> {
        self.providers.first().map(|(p, _)| p.as_str())
    }

    /// Name of the first model of a provider
    pub fn first_model(&self, provider: &str) -> Option<&str> {
        self.models(provider)?.first().map(|m| m.name.as_str())
    }

    /// Iterate providers and their models
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ModelEntry<H>])> {
        self.providers
            .iter()
            .map(|(p, models)| (p.as_str(), models.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Resolve an optional provider/model pair, defaulting each to the first
    /// registered entry. Empty strings count as omitted.
    fn lookup(&self, provider: Option<&str>, model: Option<&str>) -> Option<&H> {
        let provider = non_empty(provider).or_else(|| self.first_provider())?;
        let model = non_empty(model).or_else(|| self.first_model(provider))?;
        self.get(provider, model)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Registry of every chat and embedding model known at startup.
///
/// Built once and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    chat: ProviderMap<Arc<dyn ChatModel>>,
    embeddings: ProviderMap<Arc<dyn EmbeddingModel>>,
    client: HttpClient,
}

impl ModelRegistry {
    pub fn new(
        chat: ProviderMap<Arc<dyn ChatModel>>,
        embeddings: ProviderMap<Arc<dyn EmbeddingModel>>,
        client: HttpClient,
    ) -> Self {
        Self {
            chat,
            embeddings,
            client,
        }
    }

    /// All chat model providers
    pub fn chat_providers(&self) -> &ProviderMap<Arc<dyn ChatModel>> {
        &self.chat
    }

    /// All embedding model providers
    pub fn embedding_providers(&self) -> &ProviderMap<Arc<dyn EmbeddingModel>> {
        &self.embeddings
    }

    /// Resolve the chat model for a request.
    ///
    /// The `custom_openai` provider builds a fresh model from the request's
    /// base URL and key, both of which must be present.
    pub fn resolve_chat(
        &self,
        selection: Option<&ChatModelSelection>,
    ) -> Result<Arc<dyn ChatModel>, ResolveError> {
        let provider = selection.and_then(|s| s.provider.as_deref());
        let model = selection.and_then(|s| s.model.as_deref());

        if provider == Some(CUSTOM_OPENAI_PROVIDER) {
            let selection = selection.ok_or(ResolveError::MissingCustomCredentials)?;
            let base_url = non_empty(selection.custom_openai_base_url.as_deref());
            let key = non_empty(selection.custom_openai_key.as_deref());
            let (Some(base_url), Some(key)) = (base_url, key) else {
                return Err(ResolveError::MissingCustomCredentials);
            };

            return Ok(Arc::new(OpenAiChatModel::new(
                self.client.clone(),
                base_url,
                key,
                model.unwrap_or_default(),
                CUSTOM_OPENAI_TEMPERATURE,
            )));
        }

        self.chat
            .lookup(provider, model)
            .cloned()
            .ok_or(ResolveError::InvalidModel)
    }

    /// Resolve the embeddings model for a request
    pub fn resolve_embeddings(
        &self,
        selection: Option<&EmbeddingModelSelection>,
    ) -> Result<Arc<dyn EmbeddingModel>, ResolveError> {
        let provider = selection.and_then(|s| s.provider.as_deref());
        let model = selection.and_then(|s| s.model.as_deref());

        self.embeddings
            .lookup(provider, model)
            .cloned()
            .ok_or(ResolveError::InvalidModel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ChatMessage, ChatStream, ProviderError};
    use async_trait::async_trait;

    #[derive(Debug)]
    struct NamedChat(&'static str);

    #[async_trait]
    impl ChatModel for NamedChat {
        async fn stream(&self, _messages: Vec<ChatMessage>) -> Result<ChatStream, ProviderError> {
            Ok(Box::pin(futures::stream::empty()))
        }

        fn model_name(&self) -> &str {
            self.0
        }
    }

    #[derive(Debug)]
    struct NamedEmbeddings(&'static str);

    #[async_trait]
    impl EmbeddingModel for NamedEmbeddings {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
            Ok(texts.iter().map(|_| vec![0.0]).collect())
        }

        fn model_name(&self) -> &str {
            self.0
        }
    }

    fn registry() -> ModelRegistry {
        let mut chat: ProviderMap<Arc<dyn ChatModel>> = ProviderMap::new();
        // registered out of alphabetical order on purpose
        chat.insert("zeta", "z-large", "Z Large", Arc::new(NamedChat("z-large")));
        chat.insert("zeta", "a-small", "A Small", Arc::new(NamedChat("a-small")));
        chat.insert("alpha", "gpt", "GPT", Arc::new(NamedChat("gpt")));

        let mut embeddings: ProviderMap<Arc<dyn EmbeddingModel>> = ProviderMap::new();
        embeddings.insert("zeta", "embed-1", "Embed 1", Arc::new(NamedEmbeddings("embed-1")));

        ModelRegistry::new(chat, embeddings, HttpClient::new().unwrap())
    }

    #[test]
    fn test_defaults_follow_registration_order() {
        let registry = registry();
        let chat = registry.resolve_chat(None).unwrap();
        assert_eq!(chat.model_name(), "z-large");

        let embeddings = registry.resolve_embeddings(None).unwrap();
        assert_eq!(embeddings.model_name(), "embed-1");
    }

    #[test]
    fn test_provider_without_model_uses_its_first_model() {
        let registry = registry();
        let selection = ChatModelSelection {
            provider: Some("alpha".to_string()),
            ..Default::default()
        };
        assert_eq!(registry.resolve_chat(Some(&selection)).unwrap().model_name(), "gpt");
    }

    #[test]
    fn test_explicit_selection() {
        let registry = registry();
        let selection = ChatModelSelection {
            provider: Some("zeta".to_string()),
            model: Some("a-small".to_string()),
            ..Default::default()
        };
        assert_eq!(
            registry.resolve_chat(Some(&selection)).unwrap().model_name(),
            "a-small"
        );
    }

    #[test]
    fn test_unknown_model_is_invalid() {
        let registry = registry();
        let chat = ChatModelSelection {
            provider: Some("zeta".to_string()),
            model: Some("nope".to_string()),
            ..Default::default()
        };
        assert_eq!(
            registry.resolve_chat(Some(&chat)).unwrap_err(),
            ResolveError::InvalidModel
        );

        let embeddings = EmbeddingModelSelection {
            provider: Some("missing".to_string()),
            model: None,
        };
        assert_eq!(
            registry.resolve_embeddings(Some(&embeddings)).unwrap_err(),
            ResolveError::InvalidModel
        );
    }

    #[test]
    fn test_empty_registry_is_invalid_model() {
        let registry = ModelRegistry::new(
            ProviderMap::new(),
            ProviderMap::new(),
            HttpClient::new().unwrap(),
        );
        assert_eq!(
            registry.resolve_chat(None).unwrap_err(),
            ResolveError::InvalidModel
        );
    }

    #[test]
    fn test_custom_openai_requires_credentials() {
        let registry = registry();
        let mut selection = ChatModelSelection {
            provider: Some(CUSTOM_OPENAI_PROVIDER.to_string()),
            model: Some("my-model".to_string()),
            custom_openai_base_url: Some("http://localhost:1234/v1".to_string()),
            custom_openai_key: None,
        };
        assert_eq!(
            registry.resolve_chat(Some(&selection)).unwrap_err(),
            ResolveError::MissingCustomCredentials
        );

        selection.custom_openai_key = Some("sk-test".to_string());
        selection.custom_openai_base_url = None;
        assert_eq!(
            registry.resolve_chat(Some(&selection)).unwrap_err(),
            ResolveError::MissingCustomCredentials
        );

        selection.custom_openai_base_url = Some("http://localhost:1234/v1".to_string());
        let chat = registry.resolve_chat(Some(&selection)).unwrap();
        assert_eq!(chat.model_name(), "my-model");
    }

    #[test]
    fn test_selection_json_field_names() {
        let selection: ChatModelSelection = serde_json::from_str(
            r#"{"provider":"custom_openai","model":"m","customOpenAIBaseURL":"http://x","customOpenAIKey":"k"}"#,
        )
        .unwrap();
        assert_eq!(selection.custom_openai_base_url.as_deref(), Some("http://x"));
        assert_eq!(selection.custom_openai_key.as_deref(), Some("k"));
    }

    #[test]
    fn test_insert_replaces_same_model() {
        let mut map: ProviderMap<u8> = ProviderMap::new();
        map.insert("p", "m", "M", 1);
        map.insert("p", "m", "M", 2);
        assert_eq!(map.get("p", "m"), Some(&2));
        assert_eq!(map.models("p").unwrap().len(), 1);
        assert_eq!(map.len(), 1);
    }
}
