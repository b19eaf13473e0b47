//! Polling flow integration tests
//!
//! Cadence and backoff behavior under a paused clock: a failed fetch pushes
//! the next attempt out by the backoff multiplier, a clean cycle restores the
//! normal interval, and cancellation stops the flow promptly.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use sandwich_sentinel::monitoring::start_polling_task;

use super::mock_source::MockSource;
use super::pipeline_tests::{swap, test_state};

#[tokio::test(start_paused = true)]
async fn test_error_backoff_then_recovery() {
    let (state, _alerts, metrics) = test_state("acct");
    let source = Arc::new(MockSource::new());

    // First cycle fails, the following two succeed
    source.push_fetch(Err("rpc down"));
    source.push_fetch(Ok(vec![]));
    source.push_fetch(Ok(vec![]));

    let cancel = CancellationToken::new();
    let task = tokio::spawn(start_polling_task(
        state,
        source.clone(),
        cancel.clone(),
    ));

    // Default cadence 1000ms, multiplier 5: fetches land at 1s, 6s, 7s
    tokio::time::sleep(Duration::from_millis(7_500)).await;
    cancel.cancel();
    task.await.unwrap();

    let times = source.fetch_times();
    assert_eq!(times.len(), 3, "expected exactly three fetch attempts");

    let after_error = times[1] - times[0];
    assert!(
        after_error >= Duration::from_millis(5_000),
        "retry after a failure must wait at least interval x multiplier, got {after_error:?}"
    );

    let after_success = times[2] - times[1];
    assert!(
        after_success < Duration::from_millis(5_000)
            && after_success >= Duration::from_millis(1_000),
        "cadence must revert to the normal interval after a success, got {after_success:?}"
    );

    assert_eq!(metrics.poll_errors.get(), 1);
    assert_eq!(metrics.source_health.get(), 1, "healthy after recovery");
}

#[tokio::test(start_paused = true)]
async fn test_polling_classifies_fetched_batch() {
    let (state, alerts, _metrics) = test_state("acct");
    let source = Arc::new(MockSource::new());

    for sig in ["sig-1", "sig-2", "sig-3"] {
        source.insert_descriptor(swap(sig, "P1", 0.0, 1.0));
    }
    source.push_fetch(Ok(vec!["sig-1", "sig-2", "sig-3"]));

    let cancel = CancellationToken::new();
    let task = tokio::spawn(start_polling_task(
        state,
        source.clone(),
        cancel.clone(),
    ));

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    cancel.cancel();
    task.await.unwrap();

    assert_eq!(source.fetch_limits()[0], 10, "polling uses the poll batch size");

    // Three same-pool swaps in one batch trip the burst threshold
    let live = alerts.live_alerts();
    assert_eq!(live.len(), 1);
    assert!(live[0].message.contains("High risk of sandwich attack"));
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_observed_within_one_interval() {
    let (state, _alerts, _metrics) = test_state("acct");
    let source = Arc::new(MockSource::new());

    let cancel = CancellationToken::new();
    let task = tokio::spawn(start_polling_task(
        state,
        source.clone(),
        cancel.clone(),
    ));

    tokio::time::sleep(Duration::from_millis(100)).await;
    cancel.cancel();

    tokio::time::timeout(Duration::from_millis(1_100), task)
        .await
        .expect("polling task must observe cancellation within one interval")
        .unwrap();
}
