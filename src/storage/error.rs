//! Allocation failure reporting.

use core::alloc::Layout;

use thiserror::Error;

/// Errors surfaced by the storage layer.
///
/// Allocation failure is the only runtime-reportable condition in this
/// crate. It propagates directly to the caller of the allocating
/// operation; never retried, never hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The underlying allocator could not satisfy the request.
    #[error("allocation of {size} bytes (align {align}) failed")]
    Exhausted {
        /// Requested size in bytes.
        size: usize,
        /// Requested alignment in bytes.
        align: usize,
    },

    /// The requested element count does not fit in a single allocation.
    #[error("requested capacity overflows isize::MAX bytes")]
    CapacityOverflow,
}

impl StorageError {
    pub(crate) fn exhausted(layout: Layout) -> Self {
        StorageError::Exhausted { size: layout.size(), align: layout.align() }
    }
}
