use std::alloc::Layout;

use thiserror::Error;

/// Errors that can occur when operating on an [`AllocVec`][crate::AllocVec].
///
/// Every variant describes a recoverable failure. Unless an operation documents otherwise, the
/// container is left exactly as it was before the failed call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A checked element access referred to an index at or beyond the current length.
    #[error("index {index} is out of bounds for a container of length {len}")]
    OutOfBounds {
        /// The index that was requested.
        index: usize,

        /// The length of the container at the time of the access.
        len: usize,
    },

    /// A range of positions was inverted or reached beyond the end of the container.
    #[error("range {first}..{last} is invalid for a container of length {len}")]
    InvalidRange {
        /// The start of the requested range.
        first: usize,

        /// The (exclusive) end of the requested range.
        last: usize,

        /// The length of the container at the time of the call.
        len: usize,
    },

    /// The requested capacity exceeds what the container can address for its item type.
    #[error("requested capacity {requested} exceeds the maximum of {max} items")]
    CapacityOverflow {
        /// The capacity that was requested.
        requested: usize,

        /// The largest capacity the container supports for its item type.
        max: usize,
    },

    /// The allocator was unable to provide a block of memory.
    #[error("allocator failed to provide a block of {} bytes aligned to {}", layout.size(), layout.align())]
    AllocationFailed {
        /// The layout of the block that could not be allocated.
        layout: Layout,
    },
}

impl Error {
    /// Used by trait implementations that have no way to report a failure to the caller.
    #[cold]
    #[inline(never)]
    pub(crate) fn panic(self) -> ! {
        panic!("{self}");
    }
}

/// A specialized `Result` type for container operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
