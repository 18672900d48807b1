//! Provider loader for building the model registry from configuration

use super::registry::{ModelRegistry, ProviderMap};
use super::{ChatModel, EmbeddingModel, OpenAiChatModel, OpenAiEmbeddings};
use crate::config::{ProviderConfig, Settings};
use crate::network::HttpClient;
use std::sync::Arc;
use tracing::{info, warn};

/// Loader for initializing model providers from configuration
pub struct ProviderLoader;

impl ProviderLoader {
    /// Load all providers from settings
    pub fn load(settings: &Settings, client: &HttpClient) -> ModelRegistry {
        let mut chat: ProviderMap<Arc<dyn ChatModel>> = ProviderMap::new();
        let mut embeddings: ProviderMap<Arc<dyn EmbeddingModel>> = ProviderMap::new();

        for provider in &settings.providers {
            let Some(api_key) = provider.api_key.as_deref().filter(|k| !k.is_empty()) else {
                warn!("Skipping provider {}: no API key configured", provider.name);
                continue;
            };

            Self::register(provider, api_key, client, &mut chat, &mut embeddings);
            info!(
                "Loaded provider: {} ({} chat, {} embedding models)",
                provider.name,
                provider.chat_models.len(),
                provider.embedding_models.len()
            );
        }

        if chat.is_empty() || embeddings.is_empty() {
            warn!("No chat or embedding models available; only custom_openai requests can be served");
        }

        ModelRegistry::new(chat, embeddings, client.clone())
    }

    fn register(
        provider: &ProviderConfig,
        api_key: &str,
        client: &HttpClient,
        chat: &mut ProviderMap<Arc<dyn ChatModel>>,
        embeddings: &mut ProviderMap<Arc<dyn EmbeddingModel>>,
    ) {
        for model in &provider.chat_models {
            let handle = OpenAiChatModel::new(
                client.clone(),
                provider.base_url.as_str(),
                api_key,
                model.upstream_model(),
                provider.temperature,
            );
            chat.insert(&provider.name, &model.name, model.display(), Arc::new(handle));
        }

        for model in &provider.embedding_models {
            let handle = OpenAiEmbeddings::new(
                client.clone(),
                provider.base_url.as_str(),
                api_key,
                model.upstream_model(),
            );
            embeddings.insert(&provider.name, &model.name, model.display(), Arc::new(handle));
        }
    }
}
