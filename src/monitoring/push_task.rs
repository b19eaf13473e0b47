//! Account-change push flow
//!
//! Subscribes to account-change notifications and, for each one, resolves a
//! small batch of the most recent signatures through the same pipeline as the
//! polling flow. A lost subscription is re-established after the backoff
//! delay; cancellation detaches the subscription explicitly so no callback
//! outlives the session.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::MonitoringState;
use crate::source::{AccountChange, SourceError, TransactionSource};

/// Outcome of waiting on the live subscription
enum PushEvent {
    /// Session cancelled
    Stopped,
    /// Notification delivered
    Change(AccountChange),
    /// Channel closed under the consumer
    Lost,
}

/// Run the push flow until the session is cancelled
pub async fn start_push_task(
    state: Arc<MonitoringState>,
    source: Arc<dyn TransactionSource>,
    cancel: CancellationToken,
) {
    let backoff = Duration::from_millis(
        state.config.poll_interval_ms * state.config.error_backoff_multiplier as u64,
    );

    tracing::info!(
        account = %state.account,
        batch_size = state.config.push_batch_size,
        "Starting account-change push task"
    );

    'session: loop {
        let mut subscription = tokio::select! {
            _ = cancel.cancelled() => break 'session,
            result = source.subscribe_account_changes(&state.account) => match result {
                Ok(subscription) => subscription,
                Err(e) => {
                    state.metrics.source_health.set(0);
                    tracing::warn!(error = %e, "Account subscription failed, retrying");
                    tokio::select! {
                        _ = cancel.cancelled() => break 'session,
                        _ = tokio::time::sleep(backoff) => continue 'session,
                    }
                }
            }
        };

        state.metrics.source_health.set(1);

        loop {
            let event = tokio::select! {
                _ = cancel.cancelled() => PushEvent::Stopped,
                change = subscription.next_change() => match change {
                    Some(change) => PushEvent::Change(change),
                    None => PushEvent::Lost,
                }
            };

            match event {
                PushEvent::Stopped => {
                    subscription.unsubscribe();
                    break 'session;
                }
                PushEvent::Change(change) => {
                    tracing::debug!(slot = change.slot, "Account change notification");
                    if let Err(e) = push_cycle(&state, source.as_ref()).await {
                        // The subscription is still live; the next
                        // notification retries naturally
                        tracing::warn!(error = %e, "Push batch failed");
                    }
                }
                PushEvent::Lost => {
                    state.metrics.resubscribes.inc();
                    tracing::warn!("Account subscription lost, resubscribing");
                    tokio::select! {
                        _ = cancel.cancelled() => break 'session,
                        _ = tokio::time::sleep(backoff) => continue 'session,
                    }
                }
            }
        }
    }

    tracing::info!("Account-change push task shutting down");
}

/// One push cycle: resolve the few most recent signatures
async fn push_cycle(
    state: &MonitoringState,
    source: &dyn TransactionSource,
) -> Result<usize, SourceError> {
    let signatures = source
        .fetch_recent_signatures(&state.account, state.config.push_batch_size)
        .await?;

    let mut classified = 0;
    for signature in &signatures {
        if state.process_signature(source, signature).await? {
            classified += 1;
        }
    }

    Ok(classified)
}
