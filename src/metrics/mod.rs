//! Metrics collection module
//!
//! Tracks cache effectiveness, agent latency and failure rates per focus
//! mode, and request outcomes.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Response times kept per focus mode
const RESPONSE_TIME_WINDOW: usize = 100;

/// Process-wide metrics collector
#[derive(Debug, Default)]
pub struct Metrics {
    /// Total search count
    total_searches: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    /// Requests rejected as invalid
    client_errors: AtomicU64,
    /// Agent runs per focus mode
    agent_runs: RwLock<HashMap<String, u64>>,
    /// Agent response times (rolling window in ms)
    response_times: RwLock<HashMap<String, Vec<u64>>>,
    agent_failures: RwLock<HashMap<String, u64>>,
    agent_successes: RwLock<HashMap<String, u64>>,
}

// Counter maps stay consistent across a panic; poisoning is ignored.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment total search count
    pub fn inc_search(&self) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_client_error(&self) {
        self.client_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an agent invocation
    pub fn record_agent_run(&self, focus_mode: &str) {
        *write(&self.agent_runs)
            .entry(focus_mode.to_string())
            .or_insert(0) += 1;
    }

    /// Record agent response time
    pub fn record_response_time(&self, focus_mode: &str, time_ms: u64) {
        let mut times = write(&self.response_times);
        let entry = times.entry(focus_mode.to_string()).or_default();

        if entry.len() >= RESPONSE_TIME_WINDOW {
            entry.remove(0);
        }
        entry.push(time_ms);
    }

    /// Record an agent run that ended in an error
    pub fn record_agent_failure(&self, focus_mode: &str) {
        *write(&self.agent_failures)
            .entry(focus_mode.to_string())
            .or_insert(0) += 1;
    }

    /// Record an agent run that produced an answer
    pub fn record_agent_success(&self, focus_mode: &str) {
        *write(&self.agent_successes)
            .entry(focus_mode.to_string())
            .or_insert(0) += 1;
    }

    /// Get total searches
    pub fn get_total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    /// Get average response time for a focus mode
    pub fn get_avg_response_time(&self, focus_mode: &str) -> Option<u64> {
        read(&self.response_times).get(focus_mode).and_then(|t| {
            if t.is_empty() {
                None
            } else {
                Some(t.iter().sum::<u64>() / t.len() as u64)
            }
        })
    }

    /// Get reliability percentage for a focus mode
    pub fn get_reliability(&self, focus_mode: &str) -> f64 {
        let failures = *read(&self.agent_failures).get(focus_mode).unwrap_or(&0);
        let successes = *read(&self.agent_successes).get(focus_mode).unwrap_or(&0);

        let total = failures + successes;
        if total == 0 {
            100.0
        } else {
            (successes as f64 / total as f64) * 100.0
        }
    }

    /// Get statistics for every focus mode that ran an agent
    pub fn get_focus_mode_stats(&self) -> HashMap<String, FocusModeStats> {
        let runs = read(&self.agent_runs).clone();

        runs.into_iter()
            .map(|(focus_mode, runs)| {
                let stats = FocusModeStats {
                    runs,
                    avg_response_time: self.get_avg_response_time(&focus_mode),
                    reliability: self.get_reliability(&focus_mode),
                };
                (focus_mode, stats)
            })
            .collect()
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        let hits = self.cache_hits.load(Ordering::Relaxed);
        let misses = self.cache_misses.load(Ordering::Relaxed);
        let lookups = hits + misses;

        MetricsSnapshot {
            total_searches: self.get_total_searches(),
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate: if lookups == 0 {
                0.0
            } else {
                hits as f64 / lookups as f64
            },
            client_errors: self.client_errors.load(Ordering::Relaxed),
            focus_modes: self.get_focus_mode_stats(),
        }
    }
}

/// Statistics for a single focus mode
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusModeStats {
    pub runs: u64,
    pub avg_response_time: Option<u64>,
    pub reliability: f64,
}

/// Serializable view of [`Metrics`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub total_searches: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_hit_rate: f64,
    pub client_errors: u64,
    pub focus_modes: HashMap<String, FocusModeStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.inc_search();
        metrics.record_agent_run("webSearch");
        metrics.record_response_time("webSearch", 100);
        metrics.record_agent_success("webSearch");

        assert_eq!(metrics.get_total_searches(), 1);
        assert_eq!(metrics.get_avg_response_time("webSearch"), Some(100));
        assert_eq!(metrics.get_reliability("webSearch"), 100.0);
    }

    #[test]
    fn test_reliability_and_window() {
        let metrics = Metrics::new();
        metrics.record_agent_success("webSearch");
        metrics.record_agent_failure("webSearch");
        assert_eq!(metrics.get_reliability("webSearch"), 50.0);

        for _ in 0..RESPONSE_TIME_WINDOW {
            metrics.record_response_time("webSearch", 10);
        }
        metrics.record_response_time("webSearch", 10 + RESPONSE_TIME_WINDOW as u64 * 10);
        // One slow sample displaced one fast one
        assert_eq!(metrics.get_avg_response_time("webSearch"), Some(20));
    }

    #[test]
    fn test_snapshot() {
        let metrics = Metrics::new();
        metrics.record_cache_hit();
        metrics.record_cache_miss();
        metrics.record_cache_miss();
        metrics.record_cache_miss();
        metrics.record_client_error();
        metrics.record_agent_run("academicSearch");

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.cache_hits, 1);
        assert_eq!(snapshot.cache_misses, 3);
        assert_eq!(snapshot.cache_hit_rate, 0.25);
        assert_eq!(snapshot.client_errors, 1);
        assert_eq!(snapshot.focus_modes["academicSearch"].runs, 1);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["cacheHits"], 1);
        assert!(json["focusModes"]["academicSearch"]["avgResponseTime"].is_null());
    }
}
