/*!
 * Core Types
 * Common types used across the simulator
 */

/// Byte offset into an arena
pub type Address = usize;

/// Byte count
pub type Size = usize;

/// Block id used by the cache hierarchy (`address / block_size`)
pub type BlockId = usize;

/// Allocation identifier. Positive and monotonic when live.
pub type AllocId = i64;

/// Sentinel returned by `malloc` on failure, and carried by free blocks
pub const ALLOC_FAILURE: AllocId = -1;
