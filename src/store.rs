use std::collections::HashMap;
use std::sync::Mutex;

use xxhash_rust::xxh3::xxh3_64;

/// Running summary statistics for one key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningStat {
    pub min: f64,
    pub max: f64,
    pub count: u64,
    pub sum: f64,
}

impl RunningStat {
    pub fn new(reading: f64) -> Self {
        Self {
            min: reading,
            max: reading,
            count: 1,
            sum: reading,
        }
    }

    /// Incorporate one new reading.
    pub fn fold(&mut self, reading: f64) {
        self.count += 1;
        self.sum += reading;
        if reading < self.min {
            self.min = reading;
        }
        if reading > self.max {
            self.max = reading;
        }
    }

    /// Combine two stats accumulated for the same key.
    pub fn merge(&mut self, other: &RunningStat) {
        self.count += other.count;
        self.sum += other.sum;
        if other.min < self.min {
            self.min = other.min;
        }
        if other.max > self.max {
            self.max = other.max;
        }
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Shared per-key statistics map, sharded to avoid funneling every worker
/// through one lock.
///
/// `fold` is linearizable per key: the shard lock serializes all updates to
/// the keys that hash into that shard, so no update is ever lost. Keys in
/// different shards never contend.
pub struct AggregateStore {
    shards: Vec<Mutex<HashMap<String, RunningStat>>>,
    mask: u64,
}

impl AggregateStore {
    /// Create a store sized for `workers` concurrent writers. The shard
    /// count is the smallest power of two >= 4x workers, so the shard pick
    /// is a mask and hot keys rarely share a lock at small pool sizes.
    pub fn new(workers: usize) -> Self {
        let shard_count = (workers.max(1) * 4).next_power_of_two();
        let shards = (0..shard_count)
            .map(|_| Mutex::new(HashMap::new()))
            .collect();
        Self {
            shards,
            mask: shard_count as u64 - 1,
        }
    }

    fn shard_for(&self, key: &str) -> &Mutex<HashMap<String, RunningStat>> {
        let idx = (xxh3_64(key.as_bytes()) & self.mask) as usize;
        &self.shards[idx]
    }

    /// Fold one reading into the stat for `key`, creating the entry on
    /// first observation. Safe to call concurrently from any number of
    /// workers.
    pub fn fold(&self, key: &str, reading: f64) {
        let mut shard = self.shard_for(key).lock().unwrap();
        match shard.get_mut(key) {
            Some(stat) => stat.fold(reading),
            None => {
                shard.insert(key.to_string(), RunningStat::new(reading));
            }
        }
    }

    /// Number of distinct keys observed so far. Takes every shard lock;
    /// meant for post-barrier reporting, not the hot path.
    pub fn key_count(&self) -> usize {
        self.shards.iter().map(|s| s.lock().unwrap().len()).sum()
    }

    /// Consume the store and yield all (key, stat) entries. Requires
    /// exclusive ownership, which the finalizer has once every worker has
    /// been joined.
    pub fn into_entries(self) -> Vec<(String, RunningStat)> {
        self.shards
            .into_iter()
            .flat_map(|shard| shard.into_inner().unwrap())
            .collect()
    }
}
