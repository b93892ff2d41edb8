/*!
 * Allocator Integration Tests
 * End-to-end scenarios and invariants over both allocator strategies
 */

use memsim::allocator::list::FitStrategy;
use memsim::core::types::ALLOC_FAILURE;
use memsim::{Allocator, AllocatorKind};
use pretty_assertions::assert_eq;

#[test]
fn list_first_fit_basic_scenario() {
    let mut alloc = AllocatorKind::list(64, FitStrategy::First);
    assert_eq!(alloc.malloc(16), 1);
    assert_eq!(alloc.malloc(16), 2);
    alloc.free(1);
    assert_eq!(alloc.malloc(8), 3);

    let dump = alloc.dump();
    assert!(dump.contains("used id=3"));
    assert!(dump.contains("used id=2"));
}

#[test]
fn list_coalesce_scenario() {
    let mut alloc = AllocatorKind::list(64, FitStrategy::First);
    let id1 = alloc.malloc(16);
    let id2 = alloc.malloc(16);
    alloc.free(id1);
    alloc.free(id2);

    let stats = alloc.stats();
    assert_eq!(stats.used_memory, 0);
    assert_eq!(stats.free_memory, 64);
    assert_eq!(stats.largest_free_block, 64);
}

#[test]
fn buddy_alloc_free_round_trip_scenario() {
    let mut alloc = AllocatorKind::buddy(1024).unwrap();
    let id = alloc.malloc(100);
    assert_eq!(id, 1);

    let stats = alloc.stats();
    assert_eq!(stats.used_memory, 128);
    assert_eq!(stats.internal_fragmentation_bytes, 28);

    alloc.free(id);
    let stats = alloc.stats();
    assert_eq!(stats.used_memory, 0);
    assert_eq!(stats.free_memory, 1024);
}

#[test]
fn buddy_fill_scenario() {
    let mut alloc = AllocatorKind::buddy(64).unwrap();
    let ids: Vec<_> = (0..4).map(|_| alloc.malloc(16)).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert_eq!(alloc.malloc(16), ALLOC_FAILURE);

    alloc.free(ids[1]);
    let id = alloc.malloc(8);
    assert!(id > 0);
}

#[test]
fn buddy_rejects_non_power_of_two_arena() {
    let result = AllocatorKind::buddy(100);
    assert!(result.is_err());
}

#[test]
fn ids_never_recycled_across_allocators() {
    for mut alloc in [
        AllocatorKind::list(64, FitStrategy::First),
        AllocatorKind::buddy(64).unwrap(),
    ] {
        let id1 = alloc.malloc(8);
        alloc.free(id1);
        let id2 = alloc.malloc(8);
        assert!(id2 > id1, "id should never be recycled after free");
    }
}

#[test]
fn free_of_unknown_id_is_silent_noop() {
    let mut list_alloc = AllocatorKind::list(64, FitStrategy::First);
    list_alloc.free(999);
    assert_eq!(list_alloc.stats().used_memory, 0);

    let mut buddy_alloc = AllocatorKind::buddy(64).unwrap();
    buddy_alloc.free(999);
    assert_eq!(buddy_alloc.stats().used_memory, 0);
}

#[test]
fn malloc_zero_always_fails() {
    let mut list_alloc = AllocatorKind::list(64, FitStrategy::First);
    assert_eq!(list_alloc.malloc(0), ALLOC_FAILURE);

    let mut buddy_alloc = AllocatorKind::buddy(64).unwrap();
    assert_eq!(buddy_alloc.malloc(0), ALLOC_FAILURE);
}

#[test]
fn worst_fit_picks_largest_satisfying_block() {
    let mut alloc = AllocatorKind::list(128, FitStrategy::Worst);
    let id1 = alloc.malloc(16); // [0..15]
    let _id2 = alloc.malloc(16); // [16..31], remainder [32..127] free (96 bytes)
    alloc.free(id1); // free blocks: [0..15] (16), [32..127] (96)
    let id = alloc.malloc(8);
    assert!(id > 0);
    // worst-fit must have carved out of the 96-byte block, not the 16-byte one
    let dump = alloc.dump();
    assert!(dump.contains(&format!("used id={}", id)));
}
