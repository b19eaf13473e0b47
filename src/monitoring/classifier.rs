//! Sandwich-risk classification
//!
//! Pure function of the descriptor and the pool's current window count;
//! no hidden state, no randomness. Signals are evaluated in priority order
//! and the first match wins:
//! 1. pool activity burst -> high
//! 2. large trade size -> medium
//! 3. price impact above warning threshold -> medium
//! 4. otherwise -> low

use crate::config::DetectionConfig;
use crate::models::{RiskLevel, RiskTrigger, SwapDescriptor, Verdict};

/// Threshold-driven risk classifier
pub struct RiskClassifier {
    pool_activity_threshold: usize,
    time_window_secs: u64,
    size_threshold_sol: f64,
    price_impact_warning_threshold: f64,
}

impl RiskClassifier {
    pub fn new(detection: &DetectionConfig) -> Self {
        Self {
            pool_activity_threshold: detection.pool_activity_threshold,
            time_window_secs: detection.time_window_secs,
            size_threshold_sol: detection.size_threshold_sol,
            price_impact_warning_threshold: detection.price_impact_warning_threshold,
        }
    }

    /// Classify one swap given the live activity count for its pool
    pub fn classify(&self, descriptor: &SwapDescriptor, activity_count: usize) -> Verdict {
        if activity_count >= self.pool_activity_threshold {
            return Verdict {
                risk: RiskLevel::High,
                reason: format!(
                    "unusual activity in pool: {} transactions in {}s",
                    activity_count, self.time_window_secs
                ),
                trigger: RiskTrigger::PoolActivity,
            };
        }

        if descriptor.estimated_size > self.size_threshold_sol {
            return Verdict {
                risk: RiskLevel::Medium,
                reason: "large transaction size relative to pool liquidity".to_string(),
                trigger: RiskTrigger::TradeSize,
            };
        }

        if descriptor.price_impact_pct > self.price_impact_warning_threshold {
            return Verdict {
                risk: RiskLevel::Medium,
                reason: format!(
                    "price impact of {:.2}% exceeds the {:.2}% warning threshold",
                    descriptor.price_impact_pct, self.price_impact_warning_threshold
                ),
                trigger: RiskTrigger::PriceImpact,
            };
        }

        Verdict {
            risk: RiskLevel::Low,
            reason: "no suspicious pattern detected".to_string(),
            trigger: RiskTrigger::None,
        }
    }
}
