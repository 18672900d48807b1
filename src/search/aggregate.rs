//! Folds an agent's event stream into a single answer

use super::models::{SearchResult, Source};
use crate::agent::{AgentEvent, AgentPayload};
use tracing::debug;

/// Error reported when the stream closes without `End` or `Error`
pub const UNEXPECTED_CLOSE: &str = "agent stream ended unexpectedly";

#[derive(Debug)]
enum State {
    Accumulating { message: String, sources: Vec<Source> },
    Finalized(SearchResult),
    Failed(String),
}

/// Aggregation state for one agent run.
///
/// Moves from accumulating to exactly one terminal state; anything arriving
/// after that is ignored.
#[derive(Debug)]
pub struct Aggregator {
    state: State,
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            state: State::Accumulating {
                message: String::new(),
                sources: Vec::new(),
            },
        }
    }

    /// Apply one event. Returns true once a terminal state is reached.
    pub fn apply(&mut self, event: AgentEvent) -> bool {
        let State::Accumulating { message, sources } = &mut self.state else {
            debug!("Ignoring agent event after completion: {:?}", event);
            return true;
        };

        match event {
            AgentEvent::Data(AgentPayload::Response(text)) => message.push_str(&text),
            AgentEvent::Data(AgentPayload::Sources(list)) => *sources = list,
            AgentEvent::Data(AgentPayload::Other(kind)) => {
                debug!("Ignoring agent payload of type {}", kind)
            }
            AgentEvent::End => {
                self.state = State::Finalized(SearchResult {
                    message: std::mem::take(message),
                    sources: std::mem::take(sources),
                });
            }
            AgentEvent::Error(error) => self.state = State::Failed(error),
        }

        self.is_terminal()
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self.state, State::Accumulating { .. })
    }

    /// Final answer, or the error that ended the run. Partial output of a
    /// failed or unterminated run is discarded.
    pub fn finish(self) -> Result<SearchResult, String> {
        match self.state {
            State::Finalized(result) => Ok(result),
            State::Failed(error) => Err(error),
            State::Accumulating { .. } => Err(UNEXPECTED_CLOSE.to_string()),
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}
