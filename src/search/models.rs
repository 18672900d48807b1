//! Search request and result data models

use crate::providers::{ChatMessage, ChatModelSelection, EmbeddingModelSelection};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Caller hint passed through to the answer agent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationMode {
    Speed,
    #[default]
    Balanced,
}

impl OptimizationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Speed => "speed",
            Self::Balanced => "balanced",
        }
    }
}

impl fmt::Display for OptimizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub focus_mode: Option<String>,
    pub optimization_mode: Option<OptimizationMode>,
    pub chat_model: Option<ChatModelSelection>,
    pub embedding_model: Option<EmbeddingModelSelection>,
    /// Prior turns as `[role, text]` pairs, oldest first
    pub history: Option<Vec<(String, String)>>,
}

impl SearchRequest {
    /// Create a request with just a query and focus mode
    pub fn new(query: impl Into<String>, focus_mode: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            focus_mode: Some(focus_mode.into()),
            ..Default::default()
        }
    }

    pub fn with_optimization_mode(mut self, mode: OptimizationMode) -> Self {
        self.optimization_mode = Some(mode);
        self
    }

    pub fn with_chat_model(mut self, selection: ChatModelSelection) -> Self {
        self.chat_model = Some(selection);
        self
    }

    pub fn with_history(mut self, history: Vec<(String, String)>) -> Self {
        self.history = Some(history);
        self
    }

    /// Effective optimization mode
    pub fn optimization_mode(&self) -> OptimizationMode {
        self.optimization_mode.unwrap_or_default()
    }

    /// History as chat messages; `human` turns become user messages,
    /// everything else assistant messages, order preserved.
    pub fn history_messages(&self) -> Vec<ChatMessage> {
        self.history
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|(role, text)| {
                if role == "human" {
                    ChatMessage::user(text.as_str())
                } else {
                    ChatMessage::assistant(text.as_str())
                }
            })
            .collect()
    }
}

/// A cited source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
    /// Any further fields the agent attached (snippet, thumbnail, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Source {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Final answer returned to callers and stored in the cache
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub message: String,
    pub sources: Vec<Source>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::Role;

    #[test]
    fn test_request_json_projection() {
        let request: SearchRequest = serde_json::from_str(
            r#"{
                "query": "what is rust",
                "focusMode": "webSearch",
                "optimizationMode": "speed",
                "chatModel": {"provider": "openai", "model": "gpt-4o"},
                "embeddingModel": {"provider": "openai", "model": "text-embedding-3-small"},
                "history": [["human", "hi"], ["assistant", "hello"]]
            }"#,
        )
        .unwrap();

        assert_eq!(request.query.as_deref(), Some("what is rust"));
        assert_eq!(request.focus_mode.as_deref(), Some("webSearch"));
        assert_eq!(request.optimization_mode(), OptimizationMode::Speed);
        assert_eq!(request.chat_model.unwrap().model.as_deref(), Some("gpt-4o"));
        assert_eq!(request.history.unwrap().len(), 2);
    }

    #[test]
    fn test_missing_fields_deserialize() {
        let request: SearchRequest = serde_json::from_str("{}").unwrap();
        assert!(request.query.is_none());
        assert!(request.focus_mode.is_none());
        assert_eq!(request.optimization_mode(), OptimizationMode::Balanced);
        assert!(request.history_messages().is_empty());
    }

    #[test]
    fn test_history_roles() {
        let request = SearchRequest::new("q", "webSearch").with_history(vec![
            ("human".to_string(), "first".to_string()),
            ("assistant".to_string(), "second".to_string()),
            ("system".to_string(), "third".to_string()),
        ]);

        let messages = request.history_messages();
        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::Assistant]);
        assert_eq!(messages[0].content, "first");
        assert_eq!(messages[2].content, "third");
    }

    #[test]
    fn test_source_keeps_extra_fields() {
        let source: Source =
            serde_json::from_str(r#"{"title":"T","url":"U","content":"snippet"}"#).unwrap();
        assert_eq!(source.extra["content"], "snippet");

        let json = serde_json::to_value(Source::new("T", "U")).unwrap();
        assert_eq!(json, serde_json::json!({"title": "T", "url": "U"}));
    }
}
