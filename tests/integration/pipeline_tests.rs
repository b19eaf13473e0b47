//! Classification pipeline integration tests
//!
//! Drives descriptors through dedup -> activity window -> classifier ->
//! alert manager exactly as both ingestion flows do.

use std::sync::Arc;

use chrono::Utc;
use sandwich_sentinel::config::{AlertsConfig, AppConfig, DetectionConfig, MonitoringConfig, RpcConfig};
use sandwich_sentinel::{
    AlertManager, AlertSeverity, MetricsState, MonitoringState, SwapDescriptor,
};

use super::mock_source::MockSource;

pub fn test_config(account: &str) -> AppConfig {
    AppConfig {
        rpc: RpcConfig {
            http_url: "http://localhost:8899".to_string(),
            ws_url: "ws://localhost:8900".to_string(),
        },
        monitoring: MonitoringConfig {
            account: account.to_string(),
            ..MonitoringConfig::default()
        },
        detection: DetectionConfig::default(),
        alerts: AlertsConfig::default(),
    }
}

pub fn test_state(account: &str) -> (Arc<MonitoringState>, Arc<AlertManager>, Arc<MetricsState>) {
    let alerts = Arc::new(AlertManager::new());
    let metrics = Arc::new(MetricsState::new());
    let state = Arc::new(MonitoringState::new(
        &test_config(account),
        alerts.clone(),
        metrics.clone(),
    ));
    (state, alerts, metrics)
}

pub fn swap(signature: &str, pool: &str, impact_pct: f64, size_sol: f64) -> SwapDescriptor {
    SwapDescriptor {
        signature: signature.to_string(),
        pool_id: pool.to_string(),
        is_swap: true,
        price_impact_pct: impact_pct,
        estimated_size: size_sol,
        observed_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_pool_burst_raises_danger_alert() {
    let (state, alerts, _metrics) = test_state("acct");
    let source = MockSource::new();

    // Three swaps hit the same pool within the 5s window
    for sig in ["sig-a", "sig-b", "sig-c"] {
        source.insert_descriptor(swap(sig, "P1", 0.0, 1.0));
    }

    assert!(state.process_signature(&source, "sig-a").await.unwrap());
    assert!(state.process_signature(&source, "sig-b").await.unwrap());
    assert!(
        alerts.live_alerts().is_empty(),
        "two swaps are below the burst threshold"
    );

    assert!(state.process_signature(&source, "sig-c").await.unwrap());

    let live = alerts.live_alerts();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].severity, AlertSeverity::Danger);
    assert!(
        live[0].message.contains("High risk of sandwich attack"),
        "unexpected message: {}",
        live[0].message
    );
    assert!(live[0].message.contains("3 transactions in 5s"));
}

#[tokio::test]
async fn test_price_impact_raises_warning_and_suggestion() {
    let (state, alerts, _metrics) = test_state("acct");
    let source = MockSource::new();

    // Impact 0.8% against the 0.5% default; size and activity unremarkable
    source.insert_descriptor(swap("sig-impact", "P2", 0.8, 1.0));
    assert!(state.process_signature(&source, "sig-impact").await.unwrap());

    let live = alerts.live_alerts();
    assert_eq!(live.len(), 2, "warning plus mitigation suggestion");

    // Newest first: the suggestion follows the warning
    assert_eq!(live[0].severity, AlertSeverity::Info);
    assert!(live[0].message.contains("slippage"));

    assert_eq!(live[1].severity, AlertSeverity::Warning);
    assert!(live[1].message.contains("Possible sandwich risk"));
    assert!(
        live[1].message.contains("0.80%"),
        "warning should cite the impact percentage: {}",
        live[1].message
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_same_signature_from_both_flows_classified_once() {
    let (state, alerts, metrics) = test_state("acct");
    let source = Arc::new(MockSource::new());
    source.insert_descriptor(swap("sig-dup", "P3", 0.8, 1.0));

    // Polling and push observe the same signature in the same cycle
    let first = {
        let state = state.clone();
        let source = source.clone();
        tokio::spawn(async move { state.process_signature(source.as_ref(), "sig-dup").await })
    };
    let second = {
        let state = state.clone();
        let source = source.clone();
        tokio::spawn(async move { state.process_signature(source.as_ref(), "sig-dup").await })
    };

    let outcomes = [
        first.await.unwrap().unwrap(),
        second.await.unwrap().unwrap(),
    ];
    assert_eq!(
        outcomes.iter().filter(|&&classified| classified).count(),
        1,
        "exactly one flow may classify the signature"
    );

    assert_eq!(source.resolve_count("sig-dup"), 1, "loser must not resolve");
    assert_eq!(metrics.swaps_classified.get(), 1);

    let warnings = alerts
        .live_alerts()
        .into_iter()
        .filter(|a| a.severity == AlertSeverity::Warning)
        .count();
    assert_eq!(warnings, 1, "at most one alert for the duplicate");
}

#[tokio::test]
async fn test_unresolvable_signature_is_skipped_and_never_retried() {
    let (state, _alerts, metrics) = test_state("acct");
    let source = MockSource::new();
    source.insert_descriptor(swap("sig-good", "P4", 0.0, 1.0));

    // Unknown to the source: skipped, but the batch continues
    assert!(!state.process_signature(&source, "sig-bad").await.unwrap());
    assert_eq!(metrics.decode_failures.get(), 1);
    assert!(state.dedup.is_processed("acct", "sig-bad"));

    assert!(state.process_signature(&source, "sig-good").await.unwrap());

    // The failed signature stays marked and is not resolved again
    assert!(!state.process_signature(&source, "sig-bad").await.unwrap());
    assert_eq!(source.resolve_count("sig-bad"), 1);
}

#[tokio::test]
async fn test_non_swap_transactions_are_ignored() {
    let (state, alerts, metrics) = test_state("acct");
    let source = MockSource::new();

    let mut descriptor = swap("sig-transfer", "", 0.0, 0.0);
    descriptor.is_swap = false;
    source.insert_descriptor(descriptor);

    assert!(!state.process_signature(&source, "sig-transfer").await.unwrap());
    assert_eq!(metrics.swaps_classified.get(), 0);
    assert!(alerts.live_alerts().is_empty());
    assert!(state.dedup.is_processed("acct", "sig-transfer"));
}

#[tokio::test]
async fn test_live_alert_gauge_tracks_alert_set() {
    let (state, alerts, metrics) = test_state("acct");
    let source = MockSource::new();
    source.insert_descriptor(swap("sig-impact", "P5", 0.9, 1.0));

    state.process_signature(&source, "sig-impact").await.unwrap();
    assert_eq!(metrics.live_alerts.get() as usize, alerts.live_alerts().len());
}
