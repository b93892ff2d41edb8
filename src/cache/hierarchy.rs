/*!
 * Cache Hierarchy
 * Three inclusive-fill levels with serial, cumulative latency accounting
 */

use super::{CacheLevel, CachePolicy};
use crate::core::types::Address;
use crate::logging::AccessLog;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

const BLOCK_SIZE: usize = 16;
const MEMORY_PENALTY: u64 = 100;

pub struct CacheHierarchy {
    l1: CacheLevel,
    l2: CacheLevel,
    l3: CacheLevel,
    policy: CachePolicy,
    total_accesses: u64,
    total_cycles: u64,
    l1_hits: u64,
    l2_hits: u64,
    l3_hits: u64,
    memory_accesses: u64,
    log: AccessLog,
}

impl CacheHierarchy {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            l1: CacheLevel::new(4, 1, policy),
            l2: CacheLevel::new(8, 5, policy),
            l3: CacheLevel::new(16, 20, policy),
            policy,
            total_accesses: 0,
            total_cycles: 0,
            l1_hits: 0,
            l2_hits: 0,
            l3_hits: 0,
            memory_accesses: 0,
            log: AccessLog::new(),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn log_mut(&mut self) -> &mut AccessLog {
        &mut self.log
    }

    /// Drive the hierarchy for one memory reference at `address`.
    pub fn access(&mut self, address: Address) {
        self.total_accesses += 1;
        let block = address / BLOCK_SIZE;

        if self.l1.access(block) {
            let cycles = self.l1.hit_time();
            self.l1_hits += 1;
            self.total_cycles += cycles;
            self.log.record(&format!("access({}) -> L1 hit, {} cycles", address, cycles));
            debug!("access({}) L1 hit, block {}", address, block);
            return;
        }

        if self.l2.access(block) {
            let cycles = self.l1.hit_time() + self.l2.hit_time();
            self.l2_hits += 1;
            self.total_cycles += cycles;
            self.l1.insert(block);
            self.log.record(&format!("access({}) -> L2 hit, {} cycles", address, cycles));
            debug!("access({}) L2 hit, block {}", address, block);
            return;
        }

        if self.l3.access(block) {
            let cycles = self.l1.hit_time() + self.l2.hit_time() + self.l3.hit_time();
            self.l3_hits += 1;
            self.total_cycles += cycles;
            self.l2.insert(block);
            self.l1.insert(block);
            self.log.record(&format!("access({}) -> L3 hit, {} cycles", address, cycles));
            debug!("access({}) L3 hit, block {}", address, block);
            return;
        }

        self.memory_accesses += 1;
        let cycles = self.l1.hit_time() + self.l2.hit_time() + self.l3.hit_time() + MEMORY_PENALTY;
        self.total_cycles += cycles;
        self.l3.insert(block);
        self.l2.insert(block);
        self.l1.insert(block);
        self.log.record(&format!("access({}) -> main memory, {} cycles", address, cycles));
        debug!("access({}) memory fill, block {}", address, block);
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        writeln!(out, "Cache hierarchy, policy={}", self.policy.name()).ok();
        out.push_str(&self.l1.dump("L1"));
        out.push_str(&self.l2.dump("L2"));
        out.push_str(&self.l3.dump("L3"));
        out
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_accesses: self.total_accesses,
            l1_hits: self.l1_hits,
            l2_hits: self.l2_hits,
            l3_hits: self.l3_hits,
            memory_accesses: self.memory_accesses,
            total_cycles: self.total_cycles,
        }
    }
}

/// Snapshot of derived hit-rate and latency metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CacheStats {
    pub total_accesses: u64,
    #[serde(skip_serializing_if = "is_zero_usize_u64")]
    pub l1_hits: u64,
    #[serde(skip_serializing_if = "is_zero_usize_u64")]
    pub l2_hits: u64,
    #[serde(skip_serializing_if = "is_zero_usize_u64")]
    pub l3_hits: u64,
    #[serde(skip_serializing_if = "is_zero_usize_u64")]
    pub memory_accesses: u64,
    pub total_cycles: u64,
}

fn is_zero_usize_u64(value: &u64) -> bool {
    *value == 0
}

impl CacheStats {
    fn hit_rate(&self, hits: u64) -> f64 {
        if self.total_accesses == 0 {
            0.0
        } else {
            hits as f64 / self.total_accesses as f64 * 100.0
        }
    }

    pub fn l1_hit_rate(&self) -> f64 {
        self.hit_rate(self.l1_hits)
    }

    pub fn l2_hit_rate(&self) -> f64 {
        self.hit_rate(self.l2_hits)
    }

    pub fn l3_hit_rate(&self) -> f64 {
        self.hit_rate(self.l3_hits)
    }

    pub fn overall_hit_rate(&self) -> f64 {
        self.hit_rate(self.l1_hits + self.l2_hits + self.l3_hits)
    }

    pub fn average_access_time(&self) -> f64 {
        if self.total_accesses == 0 {
            0.0
        } else {
            self.total_cycles as f64 / self.total_accesses as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lru_hit_promotion_scenario() {
        let mut h = CacheHierarchy::new(CachePolicy::Lru);
        h.access(0);
        h.access(16);
        h.access(0);
        let stats = h.stats();
        assert_eq!(stats.total_cycles, 204);
        assert_eq!(stats.l1_hits, 1);
        assert_eq!(stats.memory_accesses, 2);
    }

    #[test]
    fn fifo_eviction_scenario() {
        let mut h = CacheHierarchy::new(CachePolicy::Fifo);
        for block in 0..9 {
            h.access(block * 16);
        }
        // ninth distinct access to block 0 must be a fresh L1 miss
        let before = h.stats();
        h.access(0);
        let after = h.stats();
        assert_eq!(after.l1_hits, before.l1_hits);
    }

    #[test]
    fn hit_accounting_law() {
        let mut h = CacheHierarchy::new(CachePolicy::Lru);
        for addr in [0, 16, 0, 32, 0, 16] {
            h.access(addr);
        }
        let stats = h.stats();
        assert_eq!(
            stats.l1_hits + (stats.total_accesses - stats.l1_hits),
            stats.total_accesses
        );
    }
}
