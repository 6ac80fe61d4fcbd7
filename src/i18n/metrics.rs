//! Translation metrics and observability module.
//!
//! Counters are owned by each `TranslationClient` rather than kept in a
//! process-wide singleton, so two clients (or two tests) never share numbers.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-client translation counters.
///
/// Whitespace-only inputs never reach the cache and are not counted.
#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Lookups answered from the shared cache, no request sent
    cache_hits: AtomicUsize,

    /// Lookups that went on to the endpoint
    cache_misses: AtomicUsize,

    /// Requests sent; equals `cache_misses` since there are no retries
    api_calls: AtomicUsize,

    /// Requests that produced no usable text: transport errors, non-2xx
    /// statuses, malformed bodies and blank segment lists alike
    api_failures: AtomicUsize,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_api_call(&self) {
        self.api_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_api_failure(&self) {
        self.api_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> usize {
        self.cache_misses.load(Ordering::Relaxed)
    }

    pub fn api_calls(&self) -> usize {
        self.api_calls.load(Ordering::Relaxed)
    }

    pub fn api_failures(&self) -> usize {
        self.api_failures.load(Ordering::Relaxed)
    }

    /// Snapshot the counters. Rates are 0 until there is something to divide by.
    pub fn report(&self) -> MetricsReport {
        let cache_hits = self.cache_hits();
        let cache_misses = self.cache_misses();
        let api_calls = self.api_calls();
        let api_failures = self.api_failures();

        MetricsReport {
            cache_hits,
            cache_misses,
            cache_hit_rate: percentage(cache_hits, cache_hits + cache_misses),
            api_calls,
            api_failures,
            api_success_rate: percentage(api_calls.saturating_sub(api_failures), api_calls),
        }
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Serializable counter snapshot, printed by `--metrics`.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub cache_hits: usize,
    pub cache_misses: usize,

    /// Cache hit rate as a percentage (0-100)
    pub cache_hit_rate: f64,

    pub api_calls: usize,
    pub api_failures: usize,

    /// API success rate as a percentage (0-100)
    pub api_success_rate: f64,
}
