//! Agent registry keyed by focus mode

use super::SearchAgent;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of answer agents
#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn SearchAgent>>,
}

impl AgentRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent under its focus mode, replacing any previous one
    pub fn register(&mut self, agent: Arc<dyn SearchAgent>) {
        self.agents.insert(agent.focus_mode().to_string(), agent);
    }

    /// Get the agent for a focus mode
    pub fn get(&self, focus_mode: &str) -> Option<&Arc<dyn SearchAgent>> {
        self.agents.get(focus_mode)
    }

    /// Check if a focus mode has an agent
    pub fn contains(&self, focus_mode: &str) -> bool {
        self.agents.contains_key(focus_mode)
    }

    /// All focus modes, sorted
    pub fn focus_modes(&self) -> Vec<&str> {
        let mut modes: Vec<&str> = self.agents.keys().map(|s| s.as_str()).collect();
        modes.sort_unstable();
        modes
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentError, AgentEvent, AgentEvents, AgentRequest};
    use async_trait::async_trait;

    #[derive(Debug)]
    struct Named(&'static str);

    #[async_trait]
    impl SearchAgent for Named {
        async fn search_and_answer(&self, _request: AgentRequest) -> Result<AgentEvents, AgentError> {
            Ok(AgentEvents::from_events(vec![AgentEvent::End]))
        }

        fn focus_mode(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_registry() {
        let mut registry = AgentRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(Named("webSearch")));
        registry.register(Arc::new(Named("academicSearch")));
        registry.register(Arc::new(Named("webSearch")));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("webSearch"));
        assert!(registry.get("redditSearch").is_none());
        assert_eq!(registry.focus_modes(), vec!["academicSearch", "webSearch"]);
    }
}
