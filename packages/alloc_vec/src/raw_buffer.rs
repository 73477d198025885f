use std::alloc::Layout;
use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::num::NonZero;
use std::ptr::{self, NonNull};

use new_zealand::nz;
use tracing::trace;

use crate::{AllocError, Allocator, Error, Result};

/// Factor by which a full buffer grows when it needs more room.
const GROWTH_FACTOR: NonZero<usize> = nz!(2);

/// The backing storage of an `AllocVec`: a single block of `capacity` slots obtained from the
/// allocator, plus the allocator itself.
///
/// The buffer knows nothing about which of its slots hold live items. Callers tell it how many
/// leading slots are live whenever it needs to move them (during relocation), and are responsible
/// for destroying live items before the buffer is released.
///
/// The pointer is `None` if and only if the capacity is zero. For zero-sized item types the
/// allocator is never called and a dangling (but non-null) pointer stands in for the block.
pub(crate) struct RawBuffer<T, A: Allocator> {
    ptr: Option<NonNull<T>>,

    capacity: usize,

    allocator: A,

    _items: PhantomData<T>,
}

impl<T, A: Allocator> RawBuffer<T, A> {
    #[must_use]
    pub(crate) const fn new_in(allocator: A) -> Self {
        Self {
            ptr: None,
            capacity: 0,
            allocator,
            _items: PhantomData,
        }
    }

    pub(crate) fn with_capacity_in(capacity: usize, allocator: A) -> Result<Self> {
        let mut buffer = Self::new_in(allocator);

        if capacity > 0 {
            buffer.ptr = Some(buffer.allocate_block(capacity)?);
            buffer.capacity = capacity;
        }

        Ok(buffer)
    }

    /// The largest capacity that can be requested for the item type, derived from the address
    /// space: no block may span more than `isize::MAX` bytes.
    #[must_use]
    pub(crate) const fn max_size() -> usize {
        match isize::MAX.unsigned_abs().checked_div(size_of::<T>()) {
            Some(max) => max,
            // Zero-sized items never occupy any memory.
            None => usize::MAX,
        }
    }

    #[must_use]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub(crate) fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Pointer to the first slot, or null if there is no buffer.
    #[must_use]
    pub(crate) fn as_ptr(&self) -> *mut T {
        self.ptr.map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    /// # Panics
    ///
    /// Panics if there is no buffer. Debug builds also panic if the index is out of bounds.
    #[must_use]
    pub(crate) fn slot(&self, index: usize) -> NonNull<T> {
        debug_assert!(
            index < self.capacity,
            "slot {index} out of bounds in buffer of {} with capacity {}",
            type_name::<T>(),
            self.capacity
        );

        let first = self.ptr.unwrap_or_else(|| {
            panic!(
                "slot {index} requested from an unallocated buffer of {}",
                type_name::<T>()
            )
        });

        // SAFETY: The caller guarantees the index is within the capacity of the block.
        unsafe { first.add(index) }
    }

    /// Replaces the allocator, returning the previous one.
    ///
    /// The caller must ensure the buffer is released or that the new allocator compares equal to
    /// the old one, otherwise the block would later be returned to the wrong allocator.
    pub(crate) fn replace_allocator(&mut self, allocator: A) -> A {
        mem::replace(&mut self.allocator, allocator)
    }

    /// Exchanges the blocks (pointer and capacity) of two buffers, leaving the allocators where
    /// they are.
    ///
    /// The caller must ensure the allocators compare equal or that the blocks are otherwise
    /// returned to the allocator that provided them.
    pub(crate) fn swap_storage(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    /// Grows the buffer so that `live + additional` items fit, doubling the current capacity (or
    /// going to exactly the required size if that is larger).
    ///
    /// # Safety
    ///
    /// The first `live` slots must hold live items and no other slot may.
    pub(crate) unsafe fn grow_amortized(&mut self, live: usize, additional: usize) -> Result<()> {
        let required = live
            .checked_add(additional)
            .ok_or(Error::CapacityOverflow {
                requested: usize::MAX,
                max: Self::max_size(),
            })?;

        if required <= self.capacity {
            return Ok(());
        }

        let doubled = self.capacity.saturating_mul(GROWTH_FACTOR.get());
        let target = doubled.min(Self::max_size()).max(required);

        // SAFETY: Forwarding the caller's guarantees.
        unsafe { self.relocate(target, live) }
    }

    /// Grows the buffer to exactly `capacity` slots if it is currently smaller.
    ///
    /// # Safety
    ///
    /// The first `live` slots must hold live items and no other slot may.
    pub(crate) unsafe fn reserve_exact(&mut self, live: usize, capacity: usize) -> Result<()> {
        if capacity <= self.capacity {
            return Ok(());
        }

        // SAFETY: Forwarding the caller's guarantees.
        unsafe { self.relocate(capacity, live) }
    }

    /// Shrinks the buffer to exactly `live` slots, releasing it entirely if `live` is zero.
    ///
    /// # Safety
    ///
    /// The first `live` slots must hold live items and no other slot may.
    pub(crate) unsafe fn shrink_to_fit(&mut self, live: usize) -> Result<()> {
        if self.capacity == live {
            return Ok(());
        }

        // SAFETY: Forwarding the caller's guarantees.
        unsafe { self.relocate(live, live) }
    }

    /// Moves the first `live` items into a fresh block of `new_capacity` slots and releases the
    /// old block. If the new block cannot be obtained, nothing changes.
    ///
    /// # Safety
    ///
    /// The first `live` slots must hold live items and no other slot may. `live` must not exceed
    /// `new_capacity`.
    unsafe fn relocate(&mut self, new_capacity: usize, live: usize) -> Result<()> {
        debug_assert!(live <= new_capacity, "relocation would lose live items");

        if new_capacity == 0 {
            self.release();
            return Ok(());
        }

        let new_ptr = self.allocate_block(new_capacity)?;

        trace!(
            item_type = type_name::<T>(),
            old_capacity = self.capacity,
            new_capacity,
            live,
            "relocating buffer"
        );

        if let Some(old_ptr) = self.ptr {
            // SAFETY: Both blocks hold at least `live` slots and are distinct allocations. Items
            // are moved bitwise; the old slots are treated as uninitialized from here on.
            unsafe {
                ptr::copy_nonoverlapping(old_ptr.as_ptr(), new_ptr.as_ptr(), live);
            }
        }

        let old_ptr = self.ptr.replace(new_ptr);
        let old_capacity = mem::replace(&mut self.capacity, new_capacity);

        if let Some(old_ptr) = old_ptr {
            // SAFETY: The old block came from our allocator with this capacity and its items
            // have all been moved out above.
            unsafe {
                self.deallocate_block(old_ptr, old_capacity);
            }
        }

        Ok(())
    }

    /// Returns the block to the allocator and resets the buffer to the empty state.
    ///
    /// Any items still in the block are leaked, so callers destroy them first. Calling this on
    /// an already released buffer does nothing.
    pub(crate) fn release(&mut self) {
        let Some(ptr) = self.ptr.take() else {
            return;
        };

        let capacity = mem::take(&mut self.capacity);

        trace!(item_type = type_name::<T>(), capacity, "releasing buffer");

        // SAFETY: The pointer was taken out of `self.ptr`, so the block cannot be released again,
        // and it was allocated by our allocator with this capacity.
        unsafe {
            self.deallocate_block(ptr, capacity);
        }
    }

    fn allocate_block(&self, capacity: usize) -> Result<NonNull<T>> {
        debug_assert!(capacity > 0, "empty blocks are represented by the absence of a block");

        let layout = Self::layout(capacity)?;

        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }

        self.allocator
            .allocate(layout)
            .map(NonNull::cast)
            .map_err(|AllocError| Error::AllocationFailed { layout })
    }

    /// # Safety
    ///
    /// The block must have come from `allocate_block()` on this buffer's allocator (or one that
    /// compares equal) with the same capacity.
    unsafe fn deallocate_block(&self, ptr: NonNull<T>, capacity: usize) {
        let layout = Self::layout(capacity)
            .expect("layout was valid when the block was allocated, so it is still valid now");

        if layout.size() == 0 {
            return;
        }

        // SAFETY: Forwarding the caller's guarantees.
        unsafe {
            self.allocator.deallocate(ptr.cast(), layout);
        }
    }

    fn layout(capacity: usize) -> Result<Layout> {
        let overflow = Error::CapacityOverflow {
            requested: capacity,
            max: Self::max_size(),
        };

        if capacity > Self::max_size() {
            return Err(overflow);
        }

        Layout::array::<T>(capacity).ok().ok_or(overflow)
    }
}

impl<T, A: Allocator> Drop for RawBuffer<T, A> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T, A: Allocator> fmt::Debug for RawBuffer<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("ptr", &self.as_ptr())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

// SAFETY: The buffer exclusively owns its block, so it can move between threads whenever the
// items and the allocator can.
unsafe impl<T: Send, A: Allocator + Send> Send for RawBuffer<T, A> {}

// SAFETY: Shared access to the buffer only hands out shared access to items and the allocator.
unsafe impl<T: Sync, A: Allocator + Sync> Sync for RawBuffer<T, A> {}
