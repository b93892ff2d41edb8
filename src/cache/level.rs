/*!
 * Cache Level
 * Fixed-capacity, fully-associative set with a pluggable eviction policy
 */

use super::CachePolicy;
use crate::core::types::BlockId;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, Copy)]
struct Entry {
    freq: usize,
    last_used: usize,
}

pub struct CacheLevel {
    capacity: usize,
    hit_time: u64,
    policy: CachePolicy,
    time_counter: usize,
    entries: HashMap<BlockId, Entry>,
    order: VecDeque<BlockId>,
}

impl CacheLevel {
    pub fn new(capacity: usize, hit_time: u64, policy: CachePolicy) -> Self {
        Self {
            capacity,
            hit_time,
            policy,
            time_counter: 0,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn hit_time(&self) -> u64 {
        self.hit_time
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Probe for `block_id`. Advances the clock regardless of outcome.
    pub fn access(&mut self, block_id: BlockId) -> bool {
        self.time_counter += 1;
        let Some(entry) = self.entries.get_mut(&block_id) else {
            return false;
        };
        entry.last_used = self.time_counter;
        entry.freq += 1;

        if self.policy == CachePolicy::Lru {
            if let Some(pos) = self.order.iter().position(|&b| b == block_id) {
                self.order.remove(pos);
                self.order.push_back(block_id);
            }
        }
        true
    }

    /// Admit `block_id`. If already resident, `last_used`/`freq` advance in
    /// place but `order` is left untouched, unlike `access`, which reorders
    /// under LRU. Otherwise evicts a victim under capacity pressure and
    /// inserts fresh with `freq = 1`.
    pub fn insert(&mut self, block_id: BlockId) {
        self.time_counter += 1;
        if let Some(entry) = self.entries.get_mut(&block_id) {
            entry.last_used = self.time_counter;
            entry.freq += 1;
            return;
        }

        if self.entries.len() >= self.capacity {
            self.evict();
        }

        self.entries.insert(
            block_id,
            Entry {
                freq: 1,
                last_used: self.time_counter,
            },
        );
        self.order.push_back(block_id);
    }

    fn evict(&mut self) {
        let victim = match self.policy {
            CachePolicy::Fifo | CachePolicy::Lru => self.order.front().copied(),
            CachePolicy::Lfu => self
                .entries
                .iter()
                .min_by_key(|(_, e)| (e.freq, e.last_used))
                .map(|(&id, _)| id),
        };

        if let Some(victim) = victim {
            self.entries.remove(&victim);
            if let Some(pos) = self.order.iter().position(|&b| b == victim) {
                self.order.remove(pos);
            }
        }
    }

    pub fn dump(&self, name: &str) -> String {
        use std::fmt::Write;
        let mut out = String::new();
        writeln!(
            out,
            "{}: {}/{} entries, policy={}, hit_time={}",
            name,
            self.entries.len(),
            self.capacity,
            self.policy.name(),
            self.hit_time
        )
        .ok();
        for &block_id in &self.order {
            if let Some(e) = self.entries.get(&block_id) {
                writeln!(out, "  block {} freq={} last_used={}", block_id, e.freq, e.last_used).ok();
            }
        }
        out
    }
}
