/*!
 * List Allocator
 * Free-list placement over a doubly-linked block chain
 */

mod block;

use crate::allocator::AllocatorStats;
use crate::core::types::{AllocId, Size, ALLOC_FAILURE};
use block::BlockChain;
use log::{info, warn};
use std::fmt::Write as _;

/// Placement strategy used to choose among free blocks large enough to
/// satisfy a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitStrategy {
    First,
    Best,
    Worst,
}

impl FitStrategy {
    pub fn name(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Best => "best",
            Self::Worst => "worst",
        }
    }
}

pub struct ListAllocator {
    chain: BlockChain,
    strategy: FitStrategy,
    total_memory: Size,
    used_memory: Size,
    total_alloc_requests: usize,
    failed_alloc_requests: usize,
    next_id: AllocId,
}

impl ListAllocator {
    pub fn new(total_memory: Size, strategy: FitStrategy) -> Self {
        info!(
            "Creating list allocator: {} bytes, {}-fit",
            total_memory,
            strategy.name()
        );
        Self {
            chain: BlockChain::new(total_memory),
            strategy,
            total_memory,
            used_memory: 0,
            total_alloc_requests: 0,
            failed_alloc_requests: 0,
            next_id: 1,
        }
    }

    pub fn strategy(&self) -> FitStrategy {
        self.strategy
    }

    /// Choose a free block index satisfying `size` under the configured
    /// strategy, ties broken by address order (earliest wins).
    fn choose(&self, size: Size) -> Option<usize> {
        let candidates = self
            .chain
            .iter_indices()
            .filter(|&i| self.chain.block(i).free && self.chain.block(i).size >= size);

        match self.strategy {
            FitStrategy::First => candidates.into_iter().next(),
            FitStrategy::Best => candidates.min_by_key(|&i| self.chain.block(i).size),
            // max_by_key keeps the *last* element on ties; the spec requires the
            // earliest address to win, so track the best index manually with a
            // strict `>` comparison (mirrors the original's `if (curr->size > best->size)`).
            FitStrategy::Worst => {
                let mut best: Option<usize> = None;
                for i in candidates {
                    if best.map_or(true, |b| self.chain.block(i).size > self.chain.block(b).size) {
                        best = Some(i);
                    }
                }
                best
            }
        }
    }

    pub fn malloc(&mut self, size: Size) -> AllocId {
        self.total_alloc_requests += 1;
        if size == 0 {
            self.failed_alloc_requests += 1;
            warn!("malloc rejected: size 0");
            return ALLOC_FAILURE;
        }

        let Some(idx) = self.choose(size) else {
            self.failed_alloc_requests += 1;
            warn!("malloc failed: no free block >= {} bytes", size);
            return ALLOC_FAILURE;
        };

        let id = self.next_id;
        self.next_id += 1;
        self.chain.take(idx, size, id);
        self.used_memory += size;
        info!("malloc({}) -> id {} ({}-fit)", size, id, self.strategy.name());
        id
    }

    pub fn free(&mut self, id: AllocId) {
        if id <= 0 {
            return;
        }
        let freed_size = self
            .chain
            .iter_indices()
            .find(|&i| !self.chain.block(i).free && self.chain.block(i).id == id)
            .map(|i| self.chain.block(i).size);

        let Some(size) = freed_size else {
            warn!("free({}) ignored: unknown id", id);
            return;
        };

        self.chain.release(id);
        self.used_memory -= size;
        info!("free({}) released {} bytes", id, size);
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        writeln!(out, "List allocator ({}-fit), {} bytes total", self.strategy.name(), self.total_memory).ok();
        for idx in self.chain.iter_indices() {
            let b = self.chain.block(idx);
            if b.free {
                writeln!(out, "  [{:>6}..{:<6}] free ({} bytes)", b.start, b.start + b.size - 1, b.size).ok();
            } else {
                writeln!(
                    out,
                    "  [{:>6}..{:<6}] used id={} ({} bytes)",
                    b.start,
                    b.start + b.size - 1,
                    b.id,
                    b.size
                )
                .ok();
            }
        }
        out
    }

    pub fn stats(&self) -> AllocatorStats {
        let largest_free = self
            .chain
            .iter_indices()
            .filter(|&i| self.chain.block(i).free)
            .map(|i| self.chain.block(i).size)
            .max()
            .unwrap_or(0);

        AllocatorStats {
            total_memory: self.total_memory,
            used_memory: self.used_memory,
            free_memory: self.total_memory - self.used_memory,
            total_alloc_requests: self.total_alloc_requests,
            failed_alloc_requests: self.failed_alloc_requests,
            internal_fragmentation_bytes: 0,
            largest_free_block: largest_free,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_fit_basic() {
        let mut a = ListAllocator::new(64, FitStrategy::First);
        assert_eq!(a.malloc(16), 1);
        assert_eq!(a.malloc(16), 2);
        a.free(1);
        assert_eq!(a.malloc(8), 3);

        let blocks: Vec<_> = a
            .chain
            .iter_indices()
            .map(|i| {
                let b = a.chain.block(i);
                (b.start, b.size, b.free, b.id)
            })
            .collect();
        assert_eq!(
            blocks,
            vec![
                (0, 8, false, 3),
                (8, 8, true, ALLOC_FAILURE),
                (16, 16, false, 2),
                (32, 32, true, ALLOC_FAILURE),
            ]
        );
    }

    #[test]
    fn coalesce_on_full_free() {
        let mut a = ListAllocator::new(64, FitStrategy::First);
        let id1 = a.malloc(16);
        let id2 = a.malloc(16);
        a.free(id1);
        a.free(id2);

        let blocks: Vec<_> = a
            .chain
            .iter_indices()
            .map(|i| {
                let b = a.chain.block(i);
                (b.start, b.size, b.free)
            })
            .collect();
        assert_eq!(blocks, vec![(0, 64, true)]);
    }

    #[test]
    fn malloc_zero_fails() {
        let mut a = ListAllocator::new(64, FitStrategy::First);
        assert_eq!(a.malloc(0), ALLOC_FAILURE);
        assert_eq!(a.stats().failed_alloc_requests, 1);
    }

    #[test]
    fn free_unknown_id_is_noop() {
        let mut a = ListAllocator::new(64, FitStrategy::First);
        a.free(999);
        assert_eq!(a.stats().used_memory, 0);
    }

    #[test]
    fn best_fit_picks_smallest_satisfying_block() {
        let mut a = ListAllocator::new(64, FitStrategy::Best);
        let id1 = a.malloc(8);
        let _id2 = a.malloc(8);
        let id3 = a.malloc(8);
        a.free(id1);
        a.free(id3);
        // free blocks: [0..7] size 8, [16..23] size 8, [24..63] size 40
        let id = a.malloc(8);
        assert!(id > 0);
        let block = a
            .chain
            .iter_indices()
            .find(|&i| a.chain.block(i).id == id)
            .map(|i| a.chain.block(i).start)
            .unwrap();
        assert_eq!(block, 0);
    }

    #[test]
    fn worst_fit_breaks_ties_on_earliest_address() {
        let mut a = ListAllocator::new(48, FitStrategy::Worst);
        let id1 = a.malloc(16);
        let _id2 = a.malloc(16);
        let id3 = a.malloc(16);
        a.free(id1);
        a.free(id3);
        // free blocks of equal size 16 at addresses 0 and 32; worst-fit must
        // pick the earliest (address 0), not the last-found one.
        let id = a.malloc(16);
        let start = a
            .chain
            .iter_indices()
            .find(|&i| a.chain.block(i).id == id)
            .map(|i| a.chain.block(i).start)
            .unwrap();
        assert_eq!(start, 0);
    }

    #[test]
    fn ids_are_monotonic_and_never_recycled() {
        let mut a = ListAllocator::new(64, FitStrategy::First);
        let id1 = a.malloc(16);
        a.free(id1);
        let id2 = a.malloc(16);
        assert!(id2 > id1);
    }
}
