//! Signature polling flow
//!
//! Fetches the most recent signatures for the monitored account on a fixed
//! cadence and feeds them through the classification pipeline. A failed
//! cycle stretches the next delay by the configured backoff multiplier; one
//! clean cycle restores the normal cadence.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::MonitoringState;
use crate::source::{SourceError, TransactionSource};

/// Run the polling flow until the session is cancelled
pub async fn start_polling_task(
    state: Arc<MonitoringState>,
    source: Arc<dyn TransactionSource>,
    cancel: CancellationToken,
) {
    let interval = Duration::from_millis(state.config.poll_interval_ms);
    let backoff = interval * state.config.error_backoff_multiplier;

    tracing::info!(
        account = %state.account,
        interval_ms = state.config.poll_interval_ms,
        batch_size = state.config.poll_batch_size,
        "Starting signature polling task"
    );

    let mut delay = interval;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Signature polling task shutting down");
                break;
            }
            _ = tokio::time::sleep(delay) => {
                match poll_cycle(&state, source.as_ref()).await {
                    Ok(classified) => {
                        state.metrics.source_health.set(1);
                        delay = interval;
                        if classified > 0 {
                            tracing::debug!(classified, "Polling cycle classified swaps");
                        }
                    }
                    Err(e) => {
                        state.metrics.poll_errors.inc();
                        state.metrics.source_health.set(0);
                        delay = backoff;
                        tracing::warn!(
                            error = %e,
                            backoff_ms = backoff.as_millis() as u64,
                            "Polling cycle failed, backing off"
                        );
                    }
                }
            }
        }
    }
}

/// One polling cycle: fetch a batch and classify whatever is new
async fn poll_cycle(
    state: &MonitoringState,
    source: &dyn TransactionSource,
) -> Result<usize, SourceError> {
    let signatures = source
        .fetch_recent_signatures(&state.account, state.config.poll_batch_size)
        .await?;

    let mut classified = 0;
    for signature in &signatures {
        if state.process_signature(source, signature).await? {
            classified += 1;
        }
    }

    Ok(classified)
}
