//! Alert management for the presentation sink
//!
//! Owns the set of live alerts:
//! - Severity-tagged records with unique ids
//! - Newest-first ordering for display
//! - Lazy time-to-live expiry on read (no background timers)
//! - Idempotent dismissal

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default alert time-to-live in seconds
const DEFAULT_ALERT_TTL_SECS: i64 = 30;

/// Alert severity, in ascending order of urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Informational notices (e.g. mitigation suggestions)
    Info,
    /// Possible risk detected
    Warning,
    /// High risk detected
    Danger,
    /// Monitoring failures surfaced to the user
    Error,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertSeverity::Info => write!(f, "info"),
            AlertSeverity::Warning => write!(f, "warning"),
            AlertSeverity::Danger => write!(f, "danger"),
            AlertSeverity::Error => write!(f, "error"),
        }
    }
}

/// A single user-facing alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRecord {
    /// Unique alert id
    pub id: Uuid,
    /// Severity for presentation ordering and styling
    pub severity: AlertSeverity,
    /// Human-readable message
    pub message: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Time-to-live in seconds
    pub ttl_secs: i64,
}

impl AlertRecord {
    /// Whether the alert has outlived its ttl at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.created_at) >= Duration::seconds(self.ttl_secs)
    }
}

/// Owner of the live alert set
///
/// Alerts move `Created -> Live -> {Expired | Dismissed}`; both end states are
/// terminal. Expiry happens lazily when the set is read, mirroring the
/// read-time eviction used by the pool activity tracker.
pub struct AlertManager {
    alerts: RwLock<Vec<AlertRecord>>,
    ttl: Duration,
}

impl AlertManager {
    /// Create an alert manager with the default 30s ttl
    pub fn new() -> Self {
        Self::with_ttl_secs(DEFAULT_ALERT_TTL_SECS)
    }

    /// Create an alert manager with a custom ttl
    pub fn with_ttl_secs(ttl_secs: i64) -> Self {
        Self {
            alerts: RwLock::new(Vec::new()),
            ttl: Duration::seconds(ttl_secs.max(0)),
        }
    }

    /// Raise a new alert, returning the stored record
    pub fn raise(&self, severity: AlertSeverity, message: impl Into<String>) -> AlertRecord {
        let record = AlertRecord {
            id: Uuid::new_v4(),
            severity,
            message: message.into(),
            created_at: Utc::now(),
            ttl_secs: self.ttl.num_seconds(),
        };

        tracing::info!(
            alert_id = %record.id,
            severity = %record.severity,
            message = %record.message,
            "Alert raised"
        );

        self.alerts.write().push(record.clone());
        record
    }

    /// Dismiss an alert immediately, regardless of remaining ttl
    ///
    /// No-op if the alert is already gone (expired or previously dismissed).
    pub fn dismiss(&self, id: Uuid) {
        let mut alerts = self.alerts.write();
        let before = alerts.len();
        alerts.retain(|a| a.id != id);
        if alerts.len() < before {
            tracing::debug!(alert_id = %id, "Alert dismissed");
        }
    }

    /// Live alerts, newest first, after evicting expired records
    pub fn live_alerts(&self) -> Vec<AlertRecord> {
        self.live_alerts_at(Utc::now())
    }

    /// Live alerts as of an explicit instant
    pub fn live_alerts_at(&self, now: DateTime<Utc>) -> Vec<AlertRecord> {
        let mut alerts = self.alerts.write();
        alerts.retain(|a| !a.is_expired(now));
        alerts.iter().rev().cloned().collect()
    }

    /// Number of live alerts without cloning them out
    pub fn live_count(&self) -> usize {
        let now = Utc::now();
        let mut alerts = self.alerts.write();
        alerts.retain(|a| !a.is_expired(now));
        alerts.len()
    }
}

impl Default for AlertManager {
    fn default() -> Self {
        Self::new()
    }
}
