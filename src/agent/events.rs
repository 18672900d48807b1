//! Agent event protocol and the channel carrying it

use super::AgentError;
use crate::search::Source;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::mpsc;

/// Events buffered between an agent task and its consumer
const EVENT_BUFFER: usize = 64;

/// Payload of a `data` event
#[derive(Debug, Clone, PartialEq)]
pub enum AgentPayload {
    /// Text fragment to append to the answer
    Response(String),
    /// Complete source list, replacing any earlier one
    Sources(Vec<Source>),
    /// Payload type this consumer does not understand
    Other(String),
}

/// One event emitted by an answer agent
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    Data(AgentPayload),
    End,
    Error(String),
}

#[derive(Debug, Deserialize)]
struct WirePayload {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

impl AgentPayload {
    /// Parse a JSON `{type, data}` payload
    pub fn from_json(raw: &str) -> Result<Self, AgentError> {
        let wire: WirePayload =
            serde_json::from_str(raw).map_err(|e| AgentError::Protocol(e.to_string()))?;

        match wire.kind.as_str() {
            "response" => match wire.data {
                Value::String(text) => Ok(Self::Response(text)),
                other => Err(AgentError::Protocol(format!(
                    "response data must be a string, got {}",
                    other
                ))),
            },
            "sources" => serde_json::from_value(wire.data)
                .map(Self::Sources)
                .map_err(|e| AgentError::Protocol(format!("invalid sources: {}", e))),
            _ => Ok(Self::Other(wire.kind)),
        }
    }
}

impl AgentEvent {
    /// Parse an event from its name and serialized payload, as emitted by
    /// agents that speak the string-payload protocol.
    pub fn from_wire(name: &str, payload: &str) -> Result<Self, AgentError> {
        match name {
            "data" => AgentPayload::from_json(payload).map(Self::Data),
            "end" => Ok(Self::End),
            "error" => {
                // Error payloads are usually `{"type":"error","data":"..."}`
                let message = serde_json::from_str::<WirePayload>(payload)
                    .ok()
                    .and_then(|w| w.data.as_str().map(str::to_string))
                    .unwrap_or_else(|| payload.to_string());
                Ok(Self::Error(message))
            }
            other => Err(AgentError::Protocol(format!("unknown event: {}", other))),
        }
    }
}

/// Producer half handed to an agent task.
///
/// `end` and `error` consume the sender, so a stream is closed exactly once.
#[derive(Debug)]
pub struct EventSender {
    tx: mpsc::Sender<AgentEvent>,
}

impl EventSender {
    /// Send a response fragment. Returns false once the consumer is gone.
    pub async fn response(&self, text: impl Into<String>) -> bool {
        self.send(AgentEvent::Data(AgentPayload::Response(text.into())))
            .await
    }

    /// Send the source list. Returns false once the consumer is gone.
    pub async fn sources(&self, sources: Vec<Source>) -> bool {
        self.send(AgentEvent::Data(AgentPayload::Sources(sources)))
            .await
    }

    pub async fn end(self) {
        self.send(AgentEvent::End).await;
    }

    pub async fn error(self, message: impl Into<String>) {
        self.send(AgentEvent::Error(message.into())).await;
    }

    async fn send(&self, event: AgentEvent) -> bool {
        self.tx.send(event).await.is_ok()
    }
}

/// Consumer half returned by an agent invocation
#[derive(Debug)]
pub struct AgentEvents {
    rx: mpsc::Receiver<AgentEvent>,
}

impl AgentEvents {
    /// Create a connected sender/receiver pair
    pub fn channel() -> (EventSender, AgentEvents) {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        (EventSender { tx }, AgentEvents { rx })
    }

    /// Next event, `None` once the producer is gone
    pub async fn recv(&mut self) -> Option<AgentEvent> {
        self.rx.recv().await
    }

    /// Stream of already-known events, mostly for tests
    pub fn from_events(events: Vec<AgentEvent>) -> Self {
        let (tx, rx) = mpsc::channel(events.len().max(1));
        for event in events {
            // Capacity covers every event
            let _ = tx.try_send(event);
        }
        AgentEvents { rx }
    }
}
