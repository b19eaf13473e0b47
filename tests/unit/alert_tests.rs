//! Alert Manager Unit Tests
//!
//! Lifecycle per alert: Created -> Live -> {Expired | Dismissed}, both
//! terminal. Presentation order is newest first; expiry is evaluated lazily
//! at read time.

use chrono::Duration;
use sandwich_sentinel::{AlertManager, AlertSeverity};

#[test]
fn test_live_until_ttl_then_absent() {
    let manager = AlertManager::with_ttl_secs(30);
    let record = manager.raise(AlertSeverity::Danger, "suspicious pool burst");

    // Present for every query before created_at + ttl
    for secs in [0i64, 1, 15, 29] {
        let live = manager.live_alerts_at(record.created_at + Duration::seconds(secs));
        assert_eq!(live.len(), 1, "alert should be live at +{secs}s");
    }

    // Absent for every query at or after created_at + ttl
    for secs in [30i64, 31, 300] {
        let live = manager.live_alerts_at(record.created_at + Duration::seconds(secs));
        assert!(live.is_empty(), "alert should be expired at +{secs}s");
    }
}

#[test]
fn test_expiry_is_terminal() {
    let manager = AlertManager::with_ttl_secs(10);
    let record = manager.raise(AlertSeverity::Warning, "possible risk");

    assert!(manager
        .live_alerts_at(record.created_at + Duration::seconds(11))
        .is_empty());

    // An earlier-now query after eviction cannot resurrect the record
    assert!(manager
        .live_alerts_at(record.created_at + Duration::seconds(5))
        .is_empty());
}

#[test]
fn test_dismissed_alert_ignores_remaining_ttl() {
    let manager = AlertManager::with_ttl_secs(3_600);
    let record = manager.raise(AlertSeverity::Info, "note");

    manager.dismiss(record.id);
    assert!(manager.live_alerts().is_empty());
}

#[test]
fn test_dismiss_unknown_id_is_noop() {
    let manager = AlertManager::new();
    manager.raise(AlertSeverity::Info, "keep me");

    manager.dismiss(uuid::Uuid::new_v4());
    assert_eq!(manager.live_alerts().len(), 1);
}

#[test]
fn test_newest_first_ordering() {
    let manager = AlertManager::new();
    let ids: Vec<_> = (0..5)
        .map(|i| manager.raise(AlertSeverity::Warning, format!("alert {i}")).id)
        .collect();

    let live = manager.live_alerts();
    let listed: Vec<_> = live.iter().map(|a| a.id).collect();
    let expected: Vec<_> = ids.into_iter().rev().collect();
    assert_eq!(listed, expected, "alerts must list newest first");
}

#[test]
fn test_severity_ordering_for_presentation() {
    assert!(AlertSeverity::Info < AlertSeverity::Warning);
    assert!(AlertSeverity::Warning < AlertSeverity::Danger);
    assert!(AlertSeverity::Danger < AlertSeverity::Error);
}

#[test]
fn test_live_count_matches_listing() {
    let manager = AlertManager::new();
    manager.raise(AlertSeverity::Warning, "one");
    manager.raise(AlertSeverity::Danger, "two");

    assert_eq!(manager.live_count(), manager.live_alerts().len());
}
