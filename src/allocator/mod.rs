/*!
 * Allocator Module
 *
 * Dynamic memory allocation over a fixed-size logical arena.
 *
 * Two placement strategies are offered behind one capability set
 * (`malloc`, `free`, `dump`, `stats`): a free-list allocator choosing among
 * first/best/worst-fit, and a buddy allocator splitting/merging power-of-two
 * extents. Both report the same [`AllocatorStats`] shape so a driver can
 * compare strategies without caring which one is live.
 */

pub mod buddy;
pub mod list;

use crate::core::errors::AllocatorError;
use crate::core::serde::is_zero_usize;
use crate::core::types::{AllocId, Size};
use buddy::BuddyAllocator;
use list::{FitStrategy, ListAllocator};
use serde::{Deserialize, Serialize};

/// Capability set shared by every allocator implementation.
pub trait Allocator {
    /// Request `size` bytes. Returns a positive monotonic id on success, or
    /// [`crate::core::types::ALLOC_FAILURE`] if no placement satisfies the request.
    fn malloc(&mut self, size: Size) -> AllocId;

    /// Release a previous allocation. A no-op if `id` is not currently live.
    fn free(&mut self, id: AllocId);

    /// Human-readable rendering of the allocator's internal state.
    fn dump(&self) -> String;

    /// Snapshot of derived metrics.
    fn stats(&self) -> AllocatorStats;
}

/// Running counters and derived metrics common to both allocators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AllocatorStats {
    pub total_memory: Size,
    #[serde(skip_serializing_if = "is_zero_usize")]
    pub used_memory: Size,
    pub free_memory: Size,
    #[serde(skip_serializing_if = "is_zero_usize")]
    pub total_alloc_requests: usize,
    #[serde(skip_serializing_if = "is_zero_usize")]
    pub failed_alloc_requests: usize,
    #[serde(skip_serializing_if = "is_zero_usize")]
    pub internal_fragmentation_bytes: Size,
    /// Largest contiguous free extent; the strategies disagree on how this
    /// maps onto their own bookkeeping, so each fills it in itself.
    #[serde(skip_serializing_if = "is_zero_usize")]
    pub largest_free_block: Size,
}

impl AllocatorStats {
    /// `(total_free - largest_free) / total_free * 100`, or 0 with no free memory.
    pub fn external_fragmentation(&self) -> f64 {
        if self.free_memory == 0 {
            0.0
        } else {
            (self.free_memory - self.largest_free_block) as f64 / self.free_memory as f64 * 100.0
        }
    }

    /// `used / total * 100`.
    pub fn utilization(&self) -> f64 {
        if self.total_memory == 0 {
            0.0
        } else {
            self.used_memory as f64 / self.total_memory as f64 * 100.0
        }
    }

    /// `failed / total_requests * 100`, or 0 with no requests yet.
    pub fn failure_rate(&self) -> f64 {
        if self.total_alloc_requests == 0 {
            0.0
        } else {
            self.failed_alloc_requests as f64 / self.total_alloc_requests as f64 * 100.0
        }
    }

    /// `internal_fragmentation_bytes / used * 100`, or 0 with nothing used.
    pub fn internal_fragmentation(&self) -> f64 {
        if self.used_memory == 0 {
            0.0
        } else {
            self.internal_fragmentation_bytes as f64 / self.used_memory as f64 * 100.0
        }
    }
}

/// Tagged union over the two allocator strategies.
///
/// Preferred over a boxed trait object here: the driver selects a strategy
/// once at `init`/`set allocator` time and the set of variants is closed.
pub enum AllocatorKind {
    List(ListAllocator),
    Buddy(BuddyAllocator),
}

impl AllocatorKind {
    /// Build a free-list allocator over an arena of `total_memory` bytes.
    pub fn list(total_memory: Size, strategy: FitStrategy) -> Self {
        Self::List(ListAllocator::new(total_memory, strategy))
    }

    /// Build a buddy allocator. Fails if `total_memory` is not a power of two.
    pub fn buddy(total_memory: Size) -> Result<Self, AllocatorError> {
        Ok(Self::Buddy(BuddyAllocator::new(total_memory)?))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::List(a) => a.strategy().name(),
            Self::Buddy(_) => "buddy",
        }
    }
}

impl Allocator for AllocatorKind {
    fn malloc(&mut self, size: Size) -> AllocId {
        match self {
            Self::List(a) => a.malloc(size),
            Self::Buddy(a) => a.malloc(size),
        }
    }

    fn free(&mut self, id: AllocId) {
        match self {
            Self::List(a) => a.free(id),
            Self::Buddy(a) => a.free(id),
        }
    }

    fn dump(&self) -> String {
        match self {
            Self::List(a) => a.dump(),
            Self::Buddy(a) => a.dump(),
        }
    }

    fn stats(&self) -> AllocatorStats {
        match self {
            Self::List(a) => a.stats(),
            Self::Buddy(a) => a.stats(),
        }
    }
}
