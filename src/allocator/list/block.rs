/*!
 * Block Chain
 * Arena + index representation of the allocator's ordered block list
 */

use crate::core::types::{Address, AllocId, Size, ALLOC_FAILURE};

/// A contiguous byte range, either free or owned by one allocation.
#[derive(Debug, Clone)]
pub struct Block {
    pub start: Address,
    pub size: Size,
    pub free: bool,
    pub id: AllocId,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Doubly-linked chain of blocks covering `[0, total)`, stored as a slot
/// vector with integer `prev`/`next` links instead of owned pointers.
///
/// Freed slots are never reused mid-lifetime (the chain only grows on
/// split); this keeps indices stable across calls, which matters because
/// `ListAllocator` holds no other reference into the chain.
pub struct BlockChain {
    slots: Vec<Block>,
    head: usize,
}

impl BlockChain {
    /// A single free block spanning the whole arena.
    pub fn new(total: Size) -> Self {
        let root = Block {
            start: 0,
            size: total,
            free: true,
            id: ALLOC_FAILURE,
            prev: None,
            next: None,
        };
        Self {
            slots: vec![root],
            head: 0,
        }
    }

    /// Indices in address order, head to tail.
    pub fn iter_indices(&self) -> impl Iterator<Item = usize> + '_ {
        let mut cur = Some(self.head);
        std::iter::from_fn(move || {
            let idx = cur?;
            cur = self.slots[idx].next;
            Some(idx)
        })
    }

    pub fn block(&self, idx: usize) -> &Block {
        &self.slots[idx]
    }

    fn block_mut(&mut self, idx: usize) -> &mut Block {
        &mut self.slots[idx]
    }

    /// Mark `idx` used, splitting off a trailing free remainder when the
    /// block is strictly larger than `size`.
    pub fn take(&mut self, idx: usize, size: Size, id: AllocId) {
        let block = self.block_mut(idx);
        let remainder = block.size - size;
        block.size = size;
        block.free = false;
        block.id = id;

        if remainder > 0 {
            let new_start = self.slots[idx].start + size;
            let next = self.slots[idx].next;
            let new_idx = self.slots.len();
            self.slots.push(Block {
                start: new_start,
                size: remainder,
                free: true,
                id: ALLOC_FAILURE,
                prev: Some(idx),
                next,
            });
            if let Some(next_idx) = next {
                self.slots[next_idx].prev = Some(new_idx);
            }
            self.slots[idx].next = Some(new_idx);
        }
    }

    /// Mark the block owning `id` free and coalesce with neighbours.
    /// Returns `true` if a block with that id was found.
    pub fn release(&mut self, id: AllocId) -> bool {
        let Some(idx) = self.iter_indices().find(|&i| !self.slots[i].free && self.slots[i].id == id) else {
            return false;
        };

        self.slots[idx].free = true;
        self.slots[idx].id = ALLOC_FAILURE;

        if let Some(next) = self.slots[idx].next {
            if self.slots[next].free {
                self.absorb_next(idx);
            }
        }
        if let Some(prev) = self.slots[idx].prev {
            if self.slots[prev].free {
                self.absorb_next(prev);
            }
        }
        true
    }

    /// Merge `self.slots[idx].next` into `idx`, dropping the successor slot
    /// from the chain (its storage slot is left orphaned, never revisited).
    fn absorb_next(&mut self, idx: usize) {
        let next_idx = self.slots[idx].next.expect("absorb_next requires a successor");
        let next_next = self.slots[next_idx].next;
        self.slots[idx].size += self.slots[next_idx].size;
        self.slots[idx].next = next_next;
        if let Some(nn) = next_next {
            self.slots[nn].prev = Some(idx);
        }
    }
}
