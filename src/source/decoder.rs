//! Swap transaction decoding
//!
//! Turns a JSON-encoded confirmed transaction into a [`SwapDescriptor`].
//! Detection is program-id based: a transaction counts as a swap when one of
//! its top-level instructions targets a known DEX program. Size is derived
//! from fee-payer balance deltas; price impact is approximated against a
//! configured nominal pool depth with the constant-product ratio.

use chrono::{DateTime, Utc};
use serde_json::Value;
use solana_sdk::native_token::LAMPORTS_PER_SOL;

use crate::models::SwapDescriptor;

/// Known DEX program ids checked against transaction instructions
pub const DEX_PROGRAM_IDS: &[&str] = &[
    "JUP4Fb2cqiRUcaTHdrPC8h2gNsA2ETXiPDD33WcGuJB", // Jupiter Aggregator
    "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin", // Serum v3
    "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8", // Raydium V4
    "whirLbMiicVdio4qvUfM5KAg6Ct8VwpYzGff3uctyCc", // Orca Whirlpool
];

/// Decoder contract: JSON transaction in, normalized descriptor out
///
/// `None` means the transaction content was unusable (missing message or
/// balance metadata); the caller treats that as a decode failure.
pub trait SwapDecoder: Send + Sync {
    fn decode(&self, signature: &str, tx: &Value) -> Option<SwapDescriptor>;
}

/// Program-id based swap decoder
pub struct ProgramIdDecoder {
    /// Nominal pool depth in SOL used for the impact approximation
    assumed_pool_depth_sol: f64,
}

impl ProgramIdDecoder {
    pub fn new(assumed_pool_depth_sol: f64) -> Self {
        Self {
            assumed_pool_depth_sol,
        }
    }

    /// Spot price impact of a `size` SOL trade against a constant-product
    /// pool with `depth` SOL on the traded side: `size / (size + depth)`
    fn approximate_impact_pct(&self, size_sol: f64) -> f64 {
        let depth = self.assumed_pool_depth_sol;
        if size_sol <= 0.0 || depth <= 0.0 {
            return 0.0;
        }
        size_sol / (size_sol + depth) * 100.0
    }
}

impl SwapDecoder for ProgramIdDecoder {
    fn decode(&self, signature: &str, tx: &Value) -> Option<SwapDescriptor> {
        let message = tx.pointer("/transaction/transaction/message")?;
        let meta = tx.pointer("/transaction/meta")?;

        let account_keys: Vec<&str> = message
            .get("accountKeys")?
            .as_array()?
            .iter()
            .filter_map(|k| k.as_str())
            .collect();
        if account_keys.is_empty() {
            return None;
        }

        let observed_at = tx
            .get("blockTime")
            .and_then(|t| t.as_i64())
            .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0))
            .unwrap_or_else(Utc::now);

        let instructions = message
            .get("instructions")
            .and_then(|i| i.as_array())
            .cloned()
            .unwrap_or_default();

        // First instruction targeting a known DEX program, if any
        let swap_instruction = instructions.iter().find(|ix| {
            ix.get("programIdIndex")
                .and_then(|i| i.as_u64())
                .and_then(|i| account_keys.get(i as usize))
                .map(|key| DEX_PROGRAM_IDS.contains(key))
                .unwrap_or(false)
        });

        let Some(instruction) = swap_instruction else {
            return Some(SwapDescriptor {
                signature: signature.to_string(),
                pool_id: String::new(),
                is_swap: false,
                price_impact_pct: 0.0,
                estimated_size: 0.0,
                observed_at,
            });
        };

        // Pool heuristic: the first account the DEX instruction references
        // that is neither the fee payer nor a known program
        let pool_id = instruction
            .get("accounts")
            .and_then(|a| a.as_array())
            .and_then(|accounts| {
                accounts
                    .iter()
                    .filter_map(|i| i.as_u64())
                    .filter(|&i| i != 0)
                    .filter_map(|i| account_keys.get(i as usize).copied())
                    .find(|key| !DEX_PROGRAM_IDS.contains(key))
                    .map(|key| key.to_string())
            })
            .unwrap_or_else(|| account_keys[0].to_string());

        let estimated_size = estimate_size_sol(meta)?;
        let price_impact_pct = self.approximate_impact_pct(estimated_size);

        Some(SwapDescriptor {
            signature: signature.to_string(),
            pool_id,
            is_swap: true,
            price_impact_pct,
            estimated_size,
            observed_at,
        })
    }
}

/// Lamports moved by the fee payer, net of the transaction fee, in SOL
fn estimate_size_sol(meta: &Value) -> Option<f64> {
    let pre = meta.get("preBalances")?.as_array()?;
    let post = meta.get("postBalances")?.as_array()?;
    let fee = meta.get("fee").and_then(|f| f.as_u64()).unwrap_or(0);

    let pre0 = pre.first()?.as_u64()? as i128;
    let post0 = post.first()?.as_u64()? as i128;

    let moved = (pre0 - post0 - fee as i128).unsigned_abs();
    Some(moved as f64 / LAMPORTS_PER_SOL as f64)
}
