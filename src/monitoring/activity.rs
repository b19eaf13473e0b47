//! Per-pool sliding-window activity tracking
//!
//! Keeps, for every pool seen recently, the ordered timestamps of swap
//! observations. Eviction is lazy: expired entries are dropped on the query
//! path, never by a background timer. Pools whose window drains empty are
//! removed outright, so memory is bounded by pools active within the window
//! rather than all pools ever seen.

use chrono::{DateTime, Duration, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};

/// Sliding-window activity tracker shared by both ingestion flows
///
/// Locking is two-level: a read-mostly map of pools, and one mutex per pool
/// timeline, so concurrent classification of swaps in unrelated pools never
/// contends. Writers hold the map read lock for the duration of the timeline
/// update, which lets the empty-pool cleanup (map write lock) prove no insert
/// is in flight before removing an entry.
pub struct PoolActivityTracker {
    pools: RwLock<HashMap<String, Mutex<VecDeque<DateTime<Utc>>>>>,
}

impl PoolActivityTracker {
    pub fn new() -> Self {
        Self {
            pools: RwLock::new(HashMap::new()),
        }
    }

    /// Record a swap observation for a pool
    pub fn record(&self, pool: &str, timestamp: DateTime<Utc>) {
        {
            let pools = self.pools.read();
            if let Some(timeline) = pools.get(pool) {
                insert_ordered(&mut timeline.lock(), timestamp);
                return;
            }
        }

        let mut pools = self.pools.write();
        let timeline = pools.entry(pool.to_string()).or_default();
        insert_ordered(&mut timeline.lock(), timestamp);
    }

    /// Evict entries older than `now - window`, then count the remainder
    pub fn count_within_window(&self, pool: &str, now: DateTime<Utc>, window: Duration) -> usize {
        let cutoff = now - window;
        let count = {
            let pools = self.pools.read();
            let Some(timeline) = pools.get(pool) else {
                return 0;
            };
            let mut timestamps = timeline.lock();
            evict_before(&mut timestamps, cutoff);
            timestamps.len()
        };

        if count == 0 {
            self.remove_if_empty(pool);
        }
        count
    }

    /// Record an observation and count the live window in one atomic step
    ///
    /// This is the classification-path operation: the pool timeline stays
    /// locked across append, eviction and count, so two concurrent
    /// classifications for the same pool each see the other's observation or
    /// run strictly before it — never a torn in-between.
    pub fn record_and_count(
        &self,
        pool: &str,
        timestamp: DateTime<Utc>,
        now: DateTime<Utc>,
        window: Duration,
    ) -> usize {
        let cutoff = now - window;
        let count = {
            let pools = self.pools.read();
            if let Some(timeline) = pools.get(pool) {
                let mut timestamps = timeline.lock();
                insert_ordered(&mut timestamps, timestamp);
                evict_before(&mut timestamps, cutoff);
                timestamps.len()
            } else {
                drop(pools);
                let mut pools = self.pools.write();
                let timeline = pools.entry(pool.to_string()).or_default();
                let mut timestamps = timeline.lock();
                insert_ordered(&mut timestamps, timestamp);
                evict_before(&mut timestamps, cutoff);
                timestamps.len()
            }
        };

        if count == 0 {
            self.remove_if_empty(pool);
        }
        count
    }

    /// Number of pools currently holding any entries
    pub fn tracked_pools(&self) -> usize {
        self.pools.read().len()
    }

    fn remove_if_empty(&self, pool: &str) {
        let mut pools = self.pools.write();
        if let Some(timeline) = pools.get(pool) {
            if timeline.lock().is_empty() {
                pools.remove(pool);
            }
        }
    }
}

impl Default for PoolActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep the timeline sorted under out-of-order arrival from concurrent
/// sources; timestamps are monotone in practice, so this is a `push_back`
/// in all but the racing case
fn insert_ordered(timestamps: &mut VecDeque<DateTime<Utc>>, timestamp: DateTime<Utc>) {
    match timestamps.back() {
        Some(last) if *last > timestamp => {
            let idx = timestamps.partition_point(|t| *t <= timestamp);
            timestamps.insert(idx, timestamp);
        }
        _ => timestamps.push_back(timestamp),
    }
}

/// Drop expired entries from the front; O(evicted), not O(history)
fn evict_before(timestamps: &mut VecDeque<DateTime<Utc>>, cutoff: DateTime<Utc>) {
    while timestamps.front().map(|t| *t < cutoff).unwrap_or(false) {
        timestamps.pop_front();
    }
}
