//! Sandwich Sentinel Library
//!
//! Real-time sandwich-attack risk monitoring for a Solana wallet.
//! This library exposes core modules for embedding and testing.

pub mod alerts;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod monitoring;
pub mod source;

// Re-export commonly used types for tests
pub use alerts::{AlertManager, AlertRecord, AlertSeverity};
pub use config::{AlertsConfig, AppConfig, DetectionConfig, MonitoringConfig, RpcConfig};
pub use error::{AppError, AppResult};
pub use metrics::MetricsState;
pub use models::{RiskLevel, RiskTrigger, SwapDescriptor, Verdict};
pub use monitoring::{
    MonitoringState, PoolActivityTracker, ProcessedSignatures, RiskClassifier, SandwichMonitor,
};
pub use source::{
    AccountChange, AccountSubscription, ProgramIdDecoder, RpcTransactionSource, SourceError,
    SwapDecoder, TransactionSource,
};
