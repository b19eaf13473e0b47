//! Domain models for swap monitoring and risk assessment

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized swap transaction record produced by the decoder
///
/// Immutable once produced. The orchestrator owns a descriptor for the
/// duration of one classification pass and drops it afterwards; no component
/// retains descriptors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapDescriptor {
    /// Transaction signature (base58)
    pub signature: String,
    /// Liquidity pool touched by the swap
    pub pool_id: String,
    /// Whether the transaction is a swap on a known DEX
    pub is_swap: bool,
    /// Estimated price impact of the swap, in percent
    pub price_impact_pct: f64,
    /// Estimated trade size in SOL
    pub estimated_size: f64,
    /// When the transaction was observed on chain
    pub observed_at: DateTime<Utc>,
}

/// Risk level of a classified swap
///
/// Ordered so that comparisons follow severity: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// Which signal produced a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTrigger {
    /// Burst of transactions in the same pool within the time window
    PoolActivity,
    /// Trade size large relative to pool liquidity
    TradeSize,
    /// Price impact above the warning threshold
    PriceImpact,
    /// Nothing suspicious
    None,
}

/// Output of risk classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// Assessed risk level
    pub risk: RiskLevel,
    /// Human-readable explanation for the presentation sink
    pub reason: String,
    /// Machine-readable signal that fired
    pub trigger: RiskTrigger,
}
