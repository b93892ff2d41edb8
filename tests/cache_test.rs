/*!
 * Cache Hierarchy Integration Tests
 * End-to-end scenarios and invariants over the three-level hierarchy
 */

use memsim::{CacheHierarchy, CachePolicy};
use pretty_assertions::assert_eq;

#[test]
fn lru_hit_promotion_scenario() {
    let mut cache = CacheHierarchy::new(CachePolicy::Lru);
    cache.access(0);
    cache.access(16);
    cache.access(0);

    let stats = cache.stats();
    assert_eq!(stats.total_cycles, 204);
    assert_eq!(stats.l1_hits, 1);
    assert_eq!(stats.memory_accesses, 2);
}

#[test]
fn fifo_eviction_scenario() {
    let mut cache = CacheHierarchy::new(CachePolicy::Fifo);
    for block in 0..5 {
        cache.access(block * 16);
    }
    let dump = cache.dump();
    // L1 (capacity 4) must have evicted block 0 by the time the fifth
    // distinct block lands, regardless of recency.
    assert!(!dump.lines().take_while(|l| !l.starts_with("L2")).any(|l| l.contains("block 0 ")));
}

#[test]
fn hit_accounting_law_holds() {
    let mut cache = CacheHierarchy::new(CachePolicy::Lru);
    for addr in [0, 16, 32, 0, 48, 16, 64, 0] {
        cache.access(addr);
    }
    let stats = cache.stats();
    assert_eq!(stats.l1_hits + (stats.total_accesses - stats.l1_hits), stats.total_accesses);
    assert!(stats.overall_hit_rate() <= 100.0);
}

#[test]
fn cycle_accounting_matches_per_access_latency() {
    let mut cache = CacheHierarchy::new(CachePolicy::Fifo);
    cache.access(0); // cold: memory fill, 1+5+20+100 = 126
    cache.access(0); // L1 hit: 1
    let stats = cache.stats();
    assert_eq!(stats.total_cycles, 127);
}

#[test]
fn inclusion_is_not_enforced() {
    let mut cache = CacheHierarchy::new(CachePolicy::Fifo);
    // fill L1 beyond capacity with distinct blocks so some are evicted from L1
    // while still resident in L2/L3
    for block in 0..6 {
        cache.access(block * 16);
    }
    // a block evicted from L1 can still be served by L2/L3 — re-accessing it
    // must not panic and must still count as a (non-L1) hit path
    cache.access(0);
    let stats = cache.stats();
    assert!(stats.total_accesses >= 7);
}

#[test]
fn policy_is_uniform_across_levels() {
    for policy in [CachePolicy::Fifo, CachePolicy::Lru, CachePolicy::Lfu] {
        let cache = CacheHierarchy::new(policy);
        assert_eq!(cache.policy(), policy);
    }
}
