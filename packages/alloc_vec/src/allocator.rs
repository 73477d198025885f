use std::alloc::{Layout, alloc, dealloc};
use std::ptr::NonNull;

use thiserror::Error;

/// The allocator was unable to satisfy a memory request.
///
/// Allocators return this from [`Allocator::allocate()`]; the container reports it to its own
/// callers as [`Error::AllocationFailed`][crate::Error::AllocationFailed] together with the layout
/// that was requested.
#[derive(Clone, Copy, Debug, Default, Eq, Error, PartialEq)]
#[error("memory allocation failed")]
pub struct AllocError;

/// Determines whether an allocator instance travels with the contents of its container when the
/// contents are copy-assigned, move-assigned or swapped into another container.
///
/// The policy is selected once per allocator type via [`Allocator::PROPAGATION`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum Propagation {
    /// The allocator always follows the contents. A container that receives contents from another
    /// container also receives a copy of the other container's allocator.
    Always,

    /// The allocator follows the contents only when the two allocators compare unequal. When they
    /// compare equal, either one can release the other's memory, so nothing needs to move.
    IfUnequal,

    /// The allocator never leaves its container. This is the default.
    ///
    /// When contents move between containers with unequal allocators, the receiving container
    /// allocates its own storage and the items are transferred one by one.
    #[default]
    Never,
}

impl Propagation {
    /// Whether a container should adopt the other container's allocator, given whether the two
    /// allocators compare equal.
    #[must_use]
    pub(crate) fn propagates(self, allocators_equal: bool) -> bool {
        match self {
            Self::Always => true,
            Self::IfUnequal => !allocators_equal,
            Self::Never => false,
        }
    }
}

/// The memory and object lifecycle services an [`AllocVec`][crate::AllocVec] consumes.
///
/// An allocator hands out raw blocks of memory and is given the opportunity to observe (or
/// customize) the placement of every item into its storage and the destruction of every item
/// still in its storage. The container never touches item memory except through these entry
/// points, never requests zero-sized blocks and always returns a block to an allocator that
/// compares equal to the one that provided it, using the same layout.
///
/// Two allocator instances that compare equal must be able to release each other's memory. A clone
/// must compare equal to the instance it was cloned from.
///
/// # Safety
///
/// Implementations of [`allocate()`][Self::allocate] must return a block that is valid for reads
/// and writes of `layout.size()` bytes and aligned to `layout.align()`, remaining valid until it is
/// passed to [`deallocate()`][Self::deallocate] on this allocator or one that compares equal to it.
///
/// Custom implementations of [`construct()`][Self::construct] must leave a valid value in the slot
/// when they return and custom implementations of [`destroy()`][Self::destroy] must end the
/// lifetime of the value in the slot exactly once.
pub unsafe trait Allocator: Clone + PartialEq {
    /// How the allocator behaves when the contents of its container are transferred.
    const PROPAGATION: Propagation = Propagation::Never;

    /// Whether all instances of this allocator type are interchangeable. When `true`, the
    /// container skips equality comparisons entirely.
    const ALWAYS_EQUAL: bool = false;

    /// Allocates a block of memory matching `layout`.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the memory could not be provided.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Releases a block of memory previously returned by [`allocate()`][Self::allocate].
    ///
    /// # Safety
    ///
    /// The block must have been allocated by this allocator (or one that compares equal to it)
    /// with the same `layout`, and must not be used after this call.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Places `value` into the uninitialized `slot`.
    ///
    /// # Safety
    ///
    /// The slot must be valid for writes, properly aligned and must not contain a live value.
    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        // SAFETY: Forwarding the caller's guarantees.
        unsafe {
            slot.write(value);
        }
    }

    /// Ends the lifetime of the value in `slot`, leaving the slot uninitialized.
    ///
    /// # Safety
    ///
    /// The slot must contain a live value that is not used again after this call.
    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        // SAFETY: Forwarding the caller's guarantees.
        unsafe {
            slot.drop_in_place();
        }
    }

    /// Returns the allocator that a copy of a container using this allocator should use.
    ///
    /// The default returns a clone of `self`.
    #[must_use]
    fn select_on_copy(&self) -> Self {
        self.clone()
    }
}

/// Whether two allocators of the same type may release each other's memory.
#[must_use]
pub(crate) fn allocators_equal<A: Allocator>(left: &A, right: &A) -> bool {
    A::ALWAYS_EQUAL || left == right
}

/// The default allocator, backed by the global Rust allocator.
///
/// All instances are interchangeable.
///
/// # Examples
///
/// ```
/// use alloc_vec::{AllocVec, Global};
///
/// let mut items = AllocVec::new_in(Global);
/// items.push(42).unwrap();
///
/// assert_eq!(items.len(), 1);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Global;

// SAFETY: We forward to the global allocator, which upholds the block validity requirements.
unsafe impl Allocator for Global {
    const ALWAYS_EQUAL: bool = true;

    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        debug_assert!(layout.size() > 0, "zero-sized blocks are never requested");

        // SAFETY: The layout is not zero-sized, which is the only requirement of `alloc()`.
        let ptr = unsafe { alloc(layout) };

        NonNull::new(ptr).ok_or(AllocError)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: The caller guarantees the block came from `allocate()` with this layout.
        unsafe {
            dealloc(ptr.as_ptr(), layout);
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Global: Send, Sync, std::fmt::Debug);
    assert_impl_all!(AllocError: Send, Sync, std::error::Error);

    #[test]
    fn propagation_table() {
        assert!(Propagation::Always.propagates(true));
        assert!(Propagation::Always.propagates(false));

        assert!(!Propagation::IfUnequal.propagates(true));
        assert!(Propagation::IfUnequal.propagates(false));

        assert!(!Propagation::Never.propagates(true));
        assert!(!Propagation::Never.propagates(false));
    }

    #[test]
    fn default_propagation_is_never() {
        assert_eq!(Propagation::default(), Propagation::Never);
        assert_eq!(Global::PROPAGATION, Propagation::Never);
    }

    #[test]
    fn global_round_trip() {
        let layout = Layout::array::<u64>(16).unwrap();

        let ptr = Global.allocate(layout).unwrap();

        // SAFETY: Freshly allocated block of 16 u64s, each slot is written before being read.
        unsafe {
            let slot = ptr.cast::<u64>();
            Global.construct(slot, 1234);
            assert_eq!(*slot.as_ptr(), 1234);
            Global.destroy(slot);
            Global.deallocate(ptr, layout);
        }
    }

    #[test]
    fn global_is_always_equal() {
        assert!(allocators_equal(&Global, &Global));
    }
}
