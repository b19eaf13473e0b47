//! Configuration management for Sandwich Sentinel
//!
//! Loads configuration from TOML/YAML files and environment variables.
//! Environment variables override file values.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// RPC endpoint configuration
    pub rpc: RpcConfig,
    /// Monitoring cadence configuration
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    /// Risk detection thresholds
    #[serde(default)]
    pub detection: DetectionConfig,
    /// Alert lifecycle configuration
    #[serde(default)]
    pub alerts: AlertsConfig,
}

/// RPC endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    /// HTTP RPC endpoint URL
    #[serde(default = "default_http_url")]
    pub http_url: String,
    /// Websocket RPC endpoint URL (account-change subscriptions)
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
}

fn default_http_url() -> String {
    "https://api.mainnet-beta.solana.com".to_string()
}

fn default_ws_url() -> String {
    "wss://api.mainnet-beta.solana.com".to_string()
}

/// Monitoring cadence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// Account (wallet) to monitor, base58 pubkey
    #[serde(default)]
    pub account: String,
    /// Interval between polling cycles in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Signatures fetched per polling cycle
    #[serde(default = "default_poll_batch_size")]
    pub poll_batch_size: usize,
    /// Signatures fetched per account-change notification
    #[serde(default = "default_push_batch_size")]
    pub push_batch_size: usize,
    /// Multiplier applied to the poll interval after a failed cycle
    #[serde(default = "default_error_backoff_multiplier")]
    pub error_backoff_multiplier: u32,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_poll_batch_size() -> usize {
    10
}

fn default_push_batch_size() -> usize {
    5
}

fn default_error_backoff_multiplier() -> u32 {
    5
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            account: String::new(),
            poll_interval_ms: default_poll_interval_ms(),
            poll_batch_size: default_poll_batch_size(),
            push_batch_size: default_push_batch_size(),
            error_backoff_multiplier: default_error_backoff_multiplier(),
        }
    }
}

/// Risk detection thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    /// Slippage tolerance threshold in percent (reserved for a
    /// slippage-settings signal; not consulted by the classifier policy)
    #[serde(default = "default_slippage_threshold")]
    pub slippage_threshold: f64,
    /// Price impact above this percentage raises a warning
    #[serde(default = "default_price_impact_warning_threshold")]
    pub price_impact_warning_threshold: f64,
    /// Transactions in the same pool within the window to flag high risk
    #[serde(default = "default_pool_activity_threshold")]
    pub pool_activity_threshold: usize,
    /// Sliding activity window in seconds
    #[serde(default = "default_time_window_secs")]
    pub time_window_secs: u64,
    /// Trade size in SOL above which risk is elevated
    #[serde(default = "default_size_threshold_sol")]
    pub size_threshold_sol: f64,
    /// Nominal pool depth in SOL used to approximate price impact
    #[serde(default = "default_assumed_pool_depth_sol")]
    pub assumed_pool_depth_sol: f64,
}

fn default_slippage_threshold() -> f64 {
    1.0
}

fn default_price_impact_warning_threshold() -> f64 {
    0.5
}

fn default_pool_activity_threshold() -> usize {
    3
}

fn default_time_window_secs() -> u64 {
    5
}

fn default_size_threshold_sol() -> f64 {
    1000.0
}

fn default_assumed_pool_depth_sol() -> f64 {
    50_000.0
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            slippage_threshold: default_slippage_threshold(),
            price_impact_warning_threshold: default_price_impact_warning_threshold(),
            pool_activity_threshold: default_pool_activity_threshold(),
            time_window_secs: default_time_window_secs(),
            size_threshold_sol: default_size_threshold_sol(),
            assumed_pool_depth_sol: default_assumed_pool_depth_sol(),
        }
    }
}

/// Alert lifecycle configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AlertsConfig {
    /// Time-to-live for raised alerts in seconds
    #[serde(default = "default_alert_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_alert_ttl_secs() -> u64 {
    30
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_alert_ttl_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SENTINEL_*)
    /// 2. config/config.{toml,yaml} (if exists)
    /// 3. config.{toml,yaml} (if exists)
    /// 4. Default values
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("rpc.http_url", default_http_url())?
            .set_default("rpc.ws_url", default_ws_url())?
            .set_default("monitoring.account", "")?
            .set_default("monitoring.poll_interval_ms", default_poll_interval_ms())?
            // Load from config files (lower priority)
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config/config").required(false))
            // Override with environment variables (highest priority - loaded last)
            // SENTINEL_MONITORING__ACCOUNT=... -> monitoring.account
            .add_source(
                Environment::with_prefix("SENTINEL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monitoring.account.is_empty() {
            return Err(ConfigError::Message(
                "Monitored account must be set via SENTINEL_MONITORING__ACCOUNT".to_string(),
            ));
        }

        if self.rpc.http_url.is_empty() || self.rpc.ws_url.is_empty() {
            return Err(ConfigError::Message(
                "RPC HTTP and websocket URLs must be set".to_string(),
            ));
        }

        if self.monitoring.poll_interval_ms == 0 {
            return Err(ConfigError::Message(
                "Poll interval must be greater than zero".to_string(),
            ));
        }

        if self.monitoring.error_backoff_multiplier == 0 {
            return Err(ConfigError::Message(
                "Error backoff multiplier must be at least 1".to_string(),
            ));
        }

        if self.detection.pool_activity_threshold == 0 || self.detection.time_window_secs == 0 {
            return Err(ConfigError::Message(
                "Pool activity threshold and time window must be greater than zero".to_string(),
            ));
        }

        if self.detection.assumed_pool_depth_sol <= 0.0 {
            return Err(ConfigError::Message(
                "Assumed pool depth must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
