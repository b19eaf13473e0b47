//! Signature deduplication across ingestion flows
//!
//! Both the polling flow and the push flow can observe the same transaction
//! near-simultaneously; whichever wins the check-and-mark here classifies it,
//! the other drops it. Entries never expire: a signature is alerted on at
//! most once per monitoring session, and a restart resetting the set is
//! acceptable because recent activity is re-derived from a fresh fetch.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// Per-account set of already-classified transaction signatures
pub struct ProcessedSignatures {
    seen: Mutex<HashMap<String, HashSet<String>>>,
}

impl ProcessedSignatures {
    pub fn new() -> Self {
        Self {
            seen: Mutex::new(HashMap::new()),
        }
    }

    /// Atomic check-and-mark
    ///
    /// Returns `true` exactly once per `(account, signature)` pair: the first
    /// caller marks the signature seen, every later caller gets `false`.
    pub fn should_process(&self, account: &str, signature: &str) -> bool {
        let mut seen = self.seen.lock();
        seen.entry(account.to_string())
            .or_default()
            .insert(signature.to_string())
    }

    /// Whether a signature has been marked, without marking it
    pub fn is_processed(&self, account: &str, signature: &str) -> bool {
        self.seen
            .lock()
            .get(account)
            .map(|sigs| sigs.contains(signature))
            .unwrap_or(false)
    }

    /// Number of signatures marked for an account
    pub fn processed_count(&self, account: &str) -> usize {
        self.seen
            .lock()
            .get(account)
            .map(|sigs| sigs.len())
            .unwrap_or(0)
    }
}

impl Default for ProcessedSignatures {
    fn default() -> Self {
        Self::new()
    }
}
