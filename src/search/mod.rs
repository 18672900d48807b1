//! Search orchestration module
//!
//! Validates requests, serves answers from the cache, resolves models and
//! the focus mode's agent, and aggregates the agent's events into the
//! final answer.

mod aggregate;
mod error;
mod models;
mod orchestrator;

pub use aggregate::{Aggregator, UNEXPECTED_CLOSE};
pub use error::SearchError;
pub use models::*;
pub use orchestrator::SearchOrchestrator;
