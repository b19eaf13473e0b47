//! Monitoring pipeline for sandwich-attack risk
//!
//! Two concurrent ingestion flows — RPC signature polling and websocket
//! account-change push — feed one classification pass:
//! dedup -> pool activity window -> risk classifier -> alert manager.
//! All shared state lives in one [`MonitoringState`] per session, so multiple
//! accounts can be monitored by independent sessions.

pub mod activity;
pub mod classifier;
pub mod dedup;
pub mod polling_task;
pub mod push_task;

pub use activity::PoolActivityTracker;
pub use classifier::RiskClassifier;
pub use dedup::ProcessedSignatures;
pub use polling_task::start_polling_task;
pub use push_task::start_push_task;

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::alerts::{AlertManager, AlertSeverity};
use crate::config::{AppConfig, MonitoringConfig};
use crate::metrics::MetricsState;
use crate::models::{RiskLevel, RiskTrigger, SwapDescriptor, Verdict};
use crate::source::{SourceError, TransactionSource};

/// Shared state for one monitoring session
pub struct MonitoringState {
    /// Account under watch
    pub account: String,
    /// Cadence configuration for both flows
    pub config: MonitoringConfig,
    pub dedup: ProcessedSignatures,
    pub activity: PoolActivityTracker,
    pub classifier: RiskClassifier,
    pub alerts: Arc<AlertManager>,
    pub metrics: Arc<MetricsState>,
    window: Duration,
}

impl MonitoringState {
    pub fn new(config: &AppConfig, alerts: Arc<AlertManager>, metrics: Arc<MetricsState>) -> Self {
        Self {
            account: config.monitoring.account.clone(),
            config: config.monitoring.clone(),
            dedup: ProcessedSignatures::new(),
            activity: PoolActivityTracker::new(),
            classifier: RiskClassifier::new(&config.detection),
            alerts,
            metrics,
            window: Duration::seconds(config.detection.time_window_secs as i64),
        }
    }

    /// Run one signature through the classification pipeline
    ///
    /// Returns `Ok(true)` when a swap was classified, `Ok(false)` when the
    /// signature was a duplicate, not a swap, or undecodable (all three stay
    /// marked processed and are never retried). Only transport-level failures
    /// propagate, so a caller can back off without aborting on bad data.
    pub async fn process_signature(
        &self,
        source: &dyn TransactionSource,
        signature: &str,
    ) -> Result<bool, SourceError> {
        self.metrics.signatures_seen.inc();

        if !self.dedup.should_process(&self.account, signature) {
            self.metrics.duplicates_skipped.inc();
            tracing::trace!(signature, "Already classified, skipping");
            return Ok(false);
        }

        let descriptor = match source.resolve_descriptor(signature).await {
            Ok(Some(descriptor)) => descriptor,
            Ok(None) => {
                self.metrics.decode_failures.inc();
                tracing::debug!(signature, "Transaction not resolvable, skipping");
                return Ok(false);
            }
            Err(SourceError::Decode {
                signature: sig,
                reason,
            }) => {
                // Undecodable content is skipped but stays marked, so the
                // batch continues and the signature is never retried
                self.metrics.decode_failures.inc();
                tracing::debug!(signature = %sig, reason = %reason, "Decode failure, skipping");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        if !descriptor.is_swap {
            tracing::trace!(signature, "Not a DEX interaction, skipping");
            return Ok(false);
        }

        self.classify_swap(&descriptor);
        Ok(true)
    }

    /// The synchronous classification pass
    ///
    /// Activity record-and-count runs atomically per pool, so concurrent
    /// classification from the two flows cannot lose or double-count
    /// observations.
    fn classify_swap(&self, descriptor: &SwapDescriptor) {
        let now = Utc::now();
        let activity_count =
            self.activity
                .record_and_count(&descriptor.pool_id, descriptor.observed_at, now, self.window);

        let verdict = self.classifier.classify(descriptor, activity_count);
        self.metrics.swaps_classified.inc();

        tracing::info!(
            signature = %descriptor.signature,
            pool = %descriptor.pool_id,
            risk = %verdict.risk,
            activity_count,
            price_impact_pct = descriptor.price_impact_pct,
            estimated_size = descriptor.estimated_size,
            "Swap classified"
        );

        self.raise_alerts(&verdict);
    }

    fn raise_alerts(&self, verdict: &Verdict) {
        match verdict.risk {
            RiskLevel::High => {
                self.alerts.raise(
                    AlertSeverity::Danger,
                    format!("High risk of sandwich attack: {}", verdict.reason),
                );
                self.metrics.alerts_raised.inc();
            }
            RiskLevel::Medium => {
                self.alerts.raise(
                    AlertSeverity::Warning,
                    format!("Possible sandwich risk: {}", verdict.reason),
                );
                self.metrics.alerts_raised.inc();

                if verdict.trigger == RiskTrigger::PriceImpact {
                    self.alerts.raise(
                        AlertSeverity::Info,
                        "Suggestions: use a lower slippage tolerance or a private RPC \
                         endpoint to protect against sandwiching",
                    );
                    self.metrics.alerts_raised.inc();
                }
            }
            RiskLevel::Low => {}
        }

        self.metrics
            .live_alerts
            .set(self.alerts.live_count() as i64);
    }
}

/// One monitoring session: both ingestion flows plus their stop switch
pub struct SandwichMonitor {
    state: Arc<MonitoringState>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl SandwichMonitor {
    pub fn new(config: &AppConfig, alerts: Arc<AlertManager>, metrics: Arc<MetricsState>) -> Self {
        Self {
            state: Arc::new(MonitoringState::new(config, alerts, metrics)),
            cancel: CancellationToken::new(),
            tasks: Vec::new(),
        }
    }

    /// Shared session state (components, metrics, alert manager)
    pub fn state(&self) -> Arc<MonitoringState> {
        Arc::clone(&self.state)
    }

    /// Token observed by both flows; cleared on shutdown
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Spawn the polling flow and the push flow
    pub fn start(&mut self, source: Arc<dyn TransactionSource>) {
        tracing::info!(account = %self.state.account, "Starting monitoring session");

        self.tasks.push(tokio::spawn(start_polling_task(
            Arc::clone(&self.state),
            Arc::clone(&source),
            self.cancel.clone(),
        )));

        self.tasks.push(tokio::spawn(start_push_task(
            Arc::clone(&self.state),
            source,
            self.cancel.clone(),
        )));
    }

    /// Stop both flows and wait for them to wind down
    ///
    /// The push flow detaches its account subscription on observing the
    /// cancellation; no other cleanup is required.
    pub async fn shutdown(mut self) {
        tracing::info!(account = %self.state.account, "Stopping monitoring session");
        self.cancel.cancel();
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Monitoring task ended abnormally");
            }
        }
    }
}
