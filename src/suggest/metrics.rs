//! Prometheus metrics for the suggestion store

use lazy_static::lazy_static;
use prometheus::{
    register_counter, register_gauge_vec, register_histogram, register_int_counter_vec, Counter,
    GaugeVec, Histogram, IntCounterVec,
};

/// Suggestion store metrics collection
pub struct SuggestMetrics {
    /// Number of index calls
    pub indexed_total: Counter,

    /// Number of lookups by outcome
    pub lookups_total: IntCounterVec,

    /// Number of entries removed by cleanup
    pub evicted_total: Counter,

    /// Entries currently stored, per store
    pub entries: GaugeVec,

    /// Cleanup sweep duration in seconds
    pub cleanup_duration: Histogram,

    /// Scheduled cleanup runs by outcome
    pub cleanup_runs_total: IntCounterVec,
}

impl SuggestMetrics {
    pub fn new() -> Self {
        Self {
            indexed_total: register_counter!(
                "suggest_indexed_total",
                "Total number of suggestion index calls"
            )
            .unwrap(),

            lookups_total: register_int_counter_vec!(
                "suggest_lookups_total",
                "Total number of suggestion lookups",
                &["outcome"]
            )
            .unwrap(),

            evicted_total: register_counter!(
                "suggest_evicted_total",
                "Total number of expired suggestions removed"
            )
            .unwrap(),

            entries: register_gauge_vec!(
                "suggest_entries",
                "Number of stored suggestions",
                &["store"]
            )
            .unwrap(),

            cleanup_duration: register_histogram!(
                "suggest_cleanup_duration_seconds",
                "Cleanup sweep duration in seconds",
                vec![0.0001, 0.001, 0.01, 0.1, 0.5, 1.0, 5.0]
            )
            .unwrap(),

            cleanup_runs_total: register_int_counter_vec!(
                "suggest_cleanup_runs_total",
                "Total number of scheduled cleanup runs",
                &["outcome"]
            )
            .unwrap(),
        }
    }

    pub fn record_lookup(&self, hits: usize) {
        let outcome = if hits == 0 { "miss" } else { "hit" };
        self.lookups_total.with_label_values(&[outcome]).inc();
    }

    pub fn record_cleanup(
        &self,
        store: &str,
        removed: usize,
        remaining: usize,
        duration_secs: f64,
    ) {
        self.evicted_total.inc_by(removed as f64);
        self.entries.with_label_values(&[store]).set(remaining as f64);
        self.cleanup_duration.observe(duration_secs);
    }

    pub fn record_cleanup_run(&self, completed: bool) {
        let outcome = if completed { "completed" } else { "aborted" };
        self.cleanup_runs_total.with_label_values(&[outcome]).inc();
    }

    /// Stop reporting a dropped store
    pub fn forget_store(&self, store: &str) {
        let _ = self.entries.remove_label_values(&[store]);
    }
}

impl Default for SuggestMetrics {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static! {
    /// Global suggestion metrics instance
    pub static ref SUGGEST_METRICS: SuggestMetrics = SuggestMetrics::new();
}

/// Initialize suggestion metrics (idempotent)
pub fn init_suggest_metrics() {
    lazy_static::initialize(&SUGGEST_METRICS);
}
