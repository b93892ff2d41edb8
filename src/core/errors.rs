/*!
 * Error Types
 * Centralized error handling with thiserror
 */

use crate::core::types::Size;
use thiserror::Error;

/// Errors raised while constructing an allocator.
///
/// Everything else in the core is infallible by design: a failed `malloc`
/// is reported through the sentinel id and the stats record, never a
/// `Result`, and a `free` of an unknown id is a silent no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocatorError {
    #[error("buddy allocator requires a power-of-two arena size, got {size}")]
    SizeNotPowerOfTwo { size: Size },
}
