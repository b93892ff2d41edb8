/*!
 * Buddy Allocator
 * Power-of-two splitting/merging allocator
 */

mod free_lists;

use crate::allocator::AllocatorStats;
use crate::core::errors::AllocatorError;
use crate::core::types::{Address, AllocId, Size, ALLOC_FAILURE};
use free_lists::BuddyFreeLists;
use log::{info, warn};
use std::collections::HashMap;
use std::fmt::Write as _;

struct AllocInfo {
    base_addr: Address,
    order: u32,
    requested_size: Size,
}

pub struct BuddyAllocator {
    free_lists: BuddyFreeLists,
    allocated: HashMap<AllocId, AllocInfo>,
    max_order: u32,
    total_memory: Size,
    used_memory: Size,
    internal_fragmentation_bytes: Size,
    total_alloc_requests: usize,
    failed_alloc_requests: usize,
    next_id: AllocId,
}

impl BuddyAllocator {
    pub fn new(total_memory: Size) -> Result<Self, AllocatorError> {
        if total_memory == 0 || !total_memory.is_power_of_two() {
            return Err(AllocatorError::SizeNotPowerOfTwo { size: total_memory });
        }
        let max_order = total_memory.trailing_zeros();
        info!("Creating buddy allocator: {} bytes, max_order {}", total_memory, max_order);
        Ok(Self {
            free_lists: BuddyFreeLists::new(max_order),
            allocated: HashMap::new(),
            max_order,
            total_memory,
            used_memory: 0,
            internal_fragmentation_bytes: 0,
            total_alloc_requests: 0,
            failed_alloc_requests: 0,
            next_id: 1,
        })
    }

    /// Smallest order `o` with `2^o >= size`.
    fn order_for(size: Size) -> u32 {
        let mut order = 0u32;
        while (1usize << order) < size {
            order += 1;
        }
        order
    }

    pub fn malloc(&mut self, size: Size) -> AllocId {
        self.total_alloc_requests += 1;
        if size == 0 {
            self.failed_alloc_requests += 1;
            warn!("malloc rejected: size 0");
            return ALLOC_FAILURE;
        }

        let order = Self::order_for(size);
        if order > self.max_order {
            self.failed_alloc_requests += 1;
            warn!("malloc failed: {} bytes exceeds arena order", size);
            return ALLOC_FAILURE;
        }

        let Some(mut curr) = self.free_lists.find_nonempty_from(order) else {
            self.failed_alloc_requests += 1;
            warn!("malloc failed: no free extent >= order {}", order);
            return ALLOC_FAILURE;
        };

        let addr = self
            .free_lists
            .pop_front(curr)
            .expect("find_nonempty_from guarantees a front element");

        while curr > order {
            curr -= 1;
            self.free_lists.push_back(curr, addr + (1usize << curr));
        }

        let id = self.next_id;
        self.next_id += 1;
        let granted = 1usize << order;
        self.used_memory += granted;
        self.internal_fragmentation_bytes += granted - size;
        self.allocated.insert(
            id,
            AllocInfo {
                base_addr: addr,
                order,
                requested_size: size,
            },
        );
        info!("malloc({}) -> id {} at addr {} (order {})", size, id, addr, order);
        id
    }

    pub fn free(&mut self, id: AllocId) {
        let Some(info) = self.allocated.remove(&id) else {
            warn!("free({}) ignored: unknown id", id);
            return;
        };

        let granted = 1usize << info.order;
        self.used_memory -= granted;
        self.internal_fragmentation_bytes -= granted - info.requested_size;

        let mut addr = info.base_addr;
        let mut order = info.order;
        while order < self.max_order {
            let buddy = addr ^ (1usize << order);
            if self.free_lists.contains(order, buddy) {
                self.free_lists.remove(order, buddy);
                addr = addr.min(buddy);
                order += 1;
            } else {
                break;
            }
        }
        self.free_lists.push_back(order, addr);
        info!("free({}) released order {} extent at {}", id, info.order, info.base_addr);
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        writeln!(out, "Buddy allocator, {} bytes total (max_order {})", self.total_memory, self.max_order).ok();
        for (order, count) in self.free_lists.occupied_orders() {
            let addrs: Vec<_> = self
                .free_lists
                .addresses_at(order)
                .map(|a| a.to_string())
                .collect();
            writeln!(out, "  order {} (size {}): {} free [{}]", order, 1usize << order, count, addrs.join(", ")).ok();
        }
        let mut allocs: Vec<_> = self.allocated.iter().collect();
        allocs.sort_by_key(|(_, info)| info.base_addr);
        for (id, info) in allocs {
            writeln!(
                out,
                "  used id={} addr={} order={} ({} bytes requested, {} granted)",
                id,
                info.base_addr,
                info.order,
                info.requested_size,
                1usize << info.order
            )
            .ok();
        }
        out
    }

    pub fn stats(&self) -> AllocatorStats {
        let total_free_units: usize = self
            .free_lists
            .occupied_orders()
            .map(|(order, count)| (1usize << order) * count)
            .sum();
        let largest_free = self
            .free_lists
            .occupied_orders()
            .map(|(order, _)| 1usize << order)
            .max()
            .unwrap_or(0);

        AllocatorStats {
            total_memory: self.total_memory,
            used_memory: self.used_memory,
            free_memory: total_free_units,
            total_alloc_requests: self.total_alloc_requests,
            failed_alloc_requests: self.failed_alloc_requests,
            internal_fragmentation_bytes: self.internal_fragmentation_bytes,
            largest_free_block: largest_free,
        }
    }
}
