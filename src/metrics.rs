//! Prometheus metrics for Sandwich Sentinel
//!
//! Collects monitoring pipeline metrics:
//! - Signature throughput and duplicate counters
//! - Alert counters and live-alert gauge
//! - Source health gauge and error counters
//!
//! The registry is exposed so an embedding service can scrape or encode it;
//! no HTTP endpoint is provided here.

use prometheus::{IntCounter, IntGauge, Opts, Registry};

/// Metrics state
pub struct MetricsState {
    /// Prometheus registry
    registry: Registry,
    /// Signatures seen by either ingestion flow
    pub signatures_seen: IntCounter,
    /// Signatures skipped as already processed
    pub duplicates_skipped: IntCounter,
    /// Swap descriptors classified
    pub swaps_classified: IntCounter,
    /// Alerts raised
    pub alerts_raised: IntCounter,
    /// Signatures whose descriptor could not be resolved
    pub decode_failures: IntCounter,
    /// Failed polling cycles
    pub poll_errors: IntCounter,
    /// Push subscription re-establishments
    pub resubscribes: IntCounter,
    /// Live alert count
    pub live_alerts: IntGauge,
    /// Source health (1 = healthy, 0 = degraded/backoff)
    pub source_health: IntGauge,
}

impl MetricsState {
    /// Create a new metrics state with all metrics registered
    pub fn new() -> Self {
        let registry = Registry::new();

        let signatures_seen = IntCounter::with_opts(Opts::new(
            "sentinel_signatures_seen_total",
            "Signatures observed by either ingestion flow",
        ))
        .expect("Failed to create signatures_seen counter");
        registry
            .register(Box::new(signatures_seen.clone()))
            .expect("Failed to register signatures_seen");

        let duplicates_skipped = IntCounter::with_opts(Opts::new(
            "sentinel_duplicates_skipped_total",
            "Signatures skipped because they were already classified",
        ))
        .expect("Failed to create duplicates_skipped counter");
        registry
            .register(Box::new(duplicates_skipped.clone()))
            .expect("Failed to register duplicates_skipped");

        let swaps_classified = IntCounter::with_opts(Opts::new(
            "sentinel_swaps_classified_total",
            "Swap descriptors run through the risk classifier",
        ))
        .expect("Failed to create swaps_classified counter");
        registry
            .register(Box::new(swaps_classified.clone()))
            .expect("Failed to register swaps_classified");

        let alerts_raised = IntCounter::with_opts(Opts::new(
            "sentinel_alerts_raised_total",
            "Alerts raised by the classification pipeline",
        ))
        .expect("Failed to create alerts_raised counter");
        registry
            .register(Box::new(alerts_raised.clone()))
            .expect("Failed to register alerts_raised");

        let decode_failures = IntCounter::with_opts(Opts::new(
            "sentinel_decode_failures_total",
            "Signatures whose swap descriptor could not be resolved",
        ))
        .expect("Failed to create decode_failures counter");
        registry
            .register(Box::new(decode_failures.clone()))
            .expect("Failed to register decode_failures");

        let poll_errors = IntCounter::with_opts(Opts::new(
            "sentinel_poll_errors_total",
            "Polling cycles that failed and triggered backoff",
        ))
        .expect("Failed to create poll_errors counter");
        registry
            .register(Box::new(poll_errors.clone()))
            .expect("Failed to register poll_errors");

        let resubscribes = IntCounter::with_opts(Opts::new(
            "sentinel_resubscribes_total",
            "Account-change subscription re-establishments",
        ))
        .expect("Failed to create resubscribes counter");
        registry
            .register(Box::new(resubscribes.clone()))
            .expect("Failed to register resubscribes");

        let live_alerts = IntGauge::with_opts(Opts::new(
            "sentinel_live_alerts",
            "Number of live (unexpired, undismissed) alerts",
        ))
        .expect("Failed to create live_alerts gauge");
        registry
            .register(Box::new(live_alerts.clone()))
            .expect("Failed to register live_alerts");

        let source_health = IntGauge::with_opts(Opts::new(
            "sentinel_source_health",
            "Transaction source health (1 = healthy, 0 = degraded)",
        ))
        .expect("Failed to create source_health gauge");
        registry
            .register(Box::new(source_health.clone()))
            .expect("Failed to register source_health");

        Self {
            registry,
            signatures_seen,
            duplicates_skipped,
            swaps_classified,
            alerts_raised,
            decode_failures,
            poll_errors,
            resubscribes,
            live_alerts,
            source_health,
        }
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for MetricsState {
    fn default() -> Self {
        Self::new()
    }
}
