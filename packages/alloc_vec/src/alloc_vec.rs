use std::any::type_name;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut};
use std::{fmt, iter, ptr, slice, thread};

use crate::{
    AllocVecBuilder, Allocator, DropPolicy, Error, Global, Position, RawBuffer, Result,
};

/// A contiguous growable sequence whose memory, item construction and item destruction are all
/// provided by an [`Allocator`].
///
/// The container owns at most one block of memory at a time. The first [`len()`][1] slots of the
/// block hold live items, the remaining slots up to [`capacity()`][2] are uninitialized. Every
/// item enters the block through [`Allocator::construct()`] and leaves it either by being moved
/// out (e.g. [`pop()`][3]) or through [`Allocator::destroy()`].
///
/// # Growth
///
/// When an item is added to a full container, the capacity doubles (or becomes 1 if it was 0).
/// Bulk insertions grow straight to the required size if that is larger than double. Use
/// [`reserve()`][4] to request an exact capacity up front and [`shrink_to_fit()`][5] to release
/// unused capacity.
///
/// # Failures
///
/// Operations that may need memory return a [`Result`][std::result::Result]. When an allocation
/// fails or the requested capacity exceeds [`max_size()`][6], the container is left unchanged.
/// Operations that produce items via user code (cloning, closures, iterators) may be interrupted
/// by a panic; the container then holds every item that was fully constructed and nothing else,
/// but the operation is not rolled back.
///
/// # Allocator transfer
///
/// How the allocator behaves when contents move between containers (copy assignment, move
/// assignment, swap) is governed by [`Allocator::PROPAGATION`]. See
/// [`try_clone_from()`][7], [`move_from()`][8] and [`swap()`][9].
///
/// [1]: Self::len
/// [2]: Self::capacity
/// [3]: Self::pop
/// [4]: Self::reserve
/// [5]: Self::shrink_to_fit
/// [6]: Self::max_size
/// [7]: Self::try_clone_from
/// [8]: Self::move_from
/// [9]: Self::swap
pub struct AllocVec<T, A: Allocator = Global> {
    pub(crate) buffer: RawBuffer<T, A>,

    /// Number of live items, occupying the slots `0..len`.
    pub(crate) len: usize,

    pub(crate) drop_policy: DropPolicy,
}

impl<T> AllocVec<T, Global> {
    /// Creates an empty container using the [`Global`] allocator. No memory is allocated until
    /// the first item is added.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloc_vec::AllocVec;
    ///
    /// let items = AllocVec::<u32>::new();
    ///
    /// assert!(items.is_empty());
    /// assert_eq!(items.capacity(), 0);
    /// ```
    #[must_use]
    #[inline]
    pub const fn new() -> Self {
        Self::new_in(Global)
    }

    /// Creates a builder that can be used to customize the container before creating it.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloc_vec::{AllocVec, DropPolicy};
    ///
    /// let items = AllocVec::<String>::builder()
    ///     .capacity(16)
    ///     .drop_policy(DropPolicy::MayDropItems)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(items.capacity(), 16);
    /// ```
    #[inline]
    pub fn builder() -> AllocVecBuilder<T, Global> {
        AllocVecBuilder::new()
    }

    /// Creates an empty container with room for exactly `capacity` items.
    ///
    /// # Errors
    ///
    /// Returns an error if the capacity exceeds [`max_size()`][Self::max_size] or if the memory
    /// cannot be allocated.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_in(capacity, Global)
    }
}

impl<T, A: Allocator> AllocVec<T, A> {
    pub(crate) fn from_buffer(buffer: RawBuffer<T, A>, drop_policy: DropPolicy) -> Self {
        Self {
            buffer,
            len: 0,
            drop_policy,
        }
    }

    /// Creates an empty container that will obtain memory from `allocator`. No memory is
    /// allocated until the first item is added.
    #[must_use]
    #[inline]
    pub const fn new_in(allocator: A) -> Self {
        Self {
            buffer: RawBuffer::new_in(allocator),
            len: 0,
            drop_policy: DropPolicy::MayDropItems,
        }
    }

    /// Creates an empty container with room for exactly `capacity` items, obtaining memory from
    /// `allocator`.
    ///
    /// # Errors
    ///
    /// Returns an error if the capacity exceeds [`max_size()`][Self::max_size] or if the memory
    /// cannot be allocated.
    pub fn with_capacity_in(capacity: usize, allocator: A) -> Result<Self> {
        Ok(Self::from_buffer(
            RawBuffer::with_capacity_in(capacity, allocator)?,
            DropPolicy::default(),
        ))
    }

    /// Creates a container holding `count` copies of `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if memory for `count` items cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloc_vec::{AllocVec, Global};
    ///
    /// let items = AllocVec::from_elem_in(3, "x".to_string(), Global).unwrap();
    ///
    /// assert_eq!(items, ["x", "x", "x"]);
    /// ```
    pub fn from_elem_in(count: usize, value: T, allocator: A) -> Result<Self>
    where
        T: Clone,
    {
        Self::from_iter_in(iter::repeat_n(value, count), allocator)
    }

    /// Creates a container holding `count` default-constructed items.
    ///
    /// # Errors
    ///
    /// Returns an error if memory for `count` items cannot be allocated.
    pub fn with_len_in(count: usize, allocator: A) -> Result<Self>
    where
        T: Default,
    {
        Self::from_iter_in(iter::repeat_with(T::default).take(count), allocator)
    }

    /// Creates a container holding the items produced by `items`, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if memory for the items cannot be allocated.
    pub fn from_iter_in<I>(items: I, allocator: A) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let items = items.into_iter();
        let (lower_bound, _) = items.size_hint();

        let mut result = Self::with_capacity_in(lower_bound, allocator)?;

        for item in items {
            result.push(item)?;
        }

        Ok(result)
    }

    /// Creates a container holding clones of the items in `items`, with capacity for exactly
    /// that many items.
    ///
    /// # Errors
    ///
    /// Returns an error if memory for the items cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloc_vec::{AllocVec, Global};
    ///
    /// let items = AllocVec::from_slice_in(&[1, 2, 3], Global).unwrap();
    ///
    /// assert_eq!(items, [1, 2, 3]);
    /// assert_eq!(items.capacity(), 3);
    /// ```
    pub fn from_slice_in(items: &[T], allocator: A) -> Result<Self>
    where
        T: Clone,
    {
        let mut result = Self::with_capacity_in(items.len(), allocator)?;

        for item in items {
            let next = result.len;

            // SAFETY: The capacity was sized for every item in the slice.
            unsafe {
                result.construct_at(next, item.clone());
            }
        }

        Ok(result)
    }

    /// Places `value` into the slot at `index` through the allocator, then counts the slot as
    /// live. Slots are brought to life strictly in order, so `index` is always the current length.
    ///
    /// If the allocator panics, the length is not changed.
    ///
    /// # Safety
    ///
    /// The length must be less than the capacity.
    pub(crate) unsafe fn construct_at(&mut self, index: usize, value: T) {
        debug_assert_eq!(index, self.len, "slots are constructed in order");
        debug_assert!(
            index < self.buffer.capacity(),
            "no room to construct an item of {}",
            type_name::<T>()
        );

        let slot = self.buffer.slot(index);

        // SAFETY: The slot is within the capacity and beyond the live range, so uninitialized.
        unsafe {
            self.buffer.allocator().construct(slot, value);
        }

        self.len = index
            .checked_add(1)
            .expect("guarded by index < capacity <= max_size");
    }

    /// Destroys the items in `first..last` through the allocator and closes the gap they leave,
    /// keeping the order of the remaining items. Empty and inverted ranges are a no-op.
    ///
    /// Items are always destroyed at the live/uninitialized boundary: a range in the middle is
    /// first rotated to the end, then destroyed from the back one item at a time. The length is
    /// decremented before each destruction, so a panicking destructor leaves the length equal to
    /// the number of live items.
    ///
    /// # Panics
    ///
    /// Panics if `last` is beyond the length.
    pub(crate) fn destroy_range(&mut self, first: usize, last: usize) {
        if first >= last {
            return;
        }

        assert!(
            last <= self.len,
            "cannot destroy {first}..{last} in a container of {} with length {}",
            type_name::<T>(),
            self.len
        );

        let count = last.wrapping_sub(first);

        if last < self.len {
            self.as_mut_slice()
                .get_mut(first..)
                .expect("guarded by first < last <= len")
                .rotate_left(count);
        }

        let new_len = self
            .len
            .checked_sub(count)
            .expect("guarded by count <= last <= len");

        while self.len > new_len {
            self.len = self.len.wrapping_sub(1);

            let slot = self.buffer.slot(self.len);

            // SAFETY: The slot was live until we excluded it from the live range above, so it is
            // destroyed exactly once and never observed again.
            unsafe {
                self.buffer.allocator().destroy(slot);
            }
        }
    }

    /// The number of live items.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the container holds no items.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of items the container can hold without reallocating.
    #[must_use]
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// The largest number of items a container of this item type can ever hold.
    #[must_use]
    #[inline]
    #[cfg_attr(test, mutants::skip)] // Mutations only change the bound, which tests cannot reach.
    pub fn max_size(&self) -> usize {
        RawBuffer::<T, A>::max_size()
    }

    /// The allocator used by the container.
    #[must_use]
    #[inline]
    pub fn allocator(&self) -> &A {
        self.buffer.allocator()
    }

    /// The [drop policy][DropPolicy] of the container.
    #[must_use]
    #[inline]
    pub fn drop_policy(&self) -> DropPolicy {
        self.drop_policy
    }

    /// Pointer to the first item, or null if the container is empty.
    ///
    /// The pointer is invalidated by any operation that reallocates.
    #[must_use]
    #[inline]
    pub fn data(&self) -> *const T {
        if self.is_empty() {
            ptr::null()
        } else {
            self.buffer.as_ptr()
        }
    }

    /// Mutable pointer to the first item, or null if the container is empty.
    ///
    /// The pointer is invalidated by any operation that reallocates.
    #[must_use]
    #[inline]
    pub fn data_mut(&mut self) -> *mut T {
        if self.is_empty() {
            ptr::null_mut()
        } else {
            self.buffer.as_ptr()
        }
    }

    /// The live items as a slice.
    #[must_use]
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        if self.is_empty() {
            return &[];
        }

        // SAFETY: The first `len` slots are live and the buffer exists since `len > 0`.
        unsafe { slice::from_raw_parts(self.buffer.as_ptr(), self.len) }
    }

    /// The live items as a mutable slice.
    #[must_use]
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        if self.is_empty() {
            return &mut [];
        }

        // SAFETY: The first `len` slots are live and the buffer exists since `len > 0`.
        unsafe { slice::from_raw_parts_mut(self.buffer.as_ptr(), self.len) }
    }

    /// Returns the item at `index`.
    ///
    /// This is the checked counterpart of indexing with `items[index]`, which panics instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index` is not less than the length.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloc_vec::AllocVec;
    ///
    /// let items = AllocVec::from([10, 20]);
    ///
    /// assert_eq!(*items.at(1).unwrap(), 20);
    /// assert!(items.at(2).is_err());
    /// ```
    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.len;

        self.as_slice()
            .get(index)
            .ok_or(Error::OutOfBounds { index, len })
    }

    /// Returns the item at `index` for modification.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index` is not less than the length.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len;

        self.as_mut_slice()
            .get_mut(index)
            .ok_or(Error::OutOfBounds { index, len })
    }

    /// The first item, if any.
    #[must_use]
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// The first item for modification, if any.
    #[must_use]
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    /// The last item, if any.
    #[must_use]
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// The last item for modification, if any.
    #[must_use]
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Ensures the capacity is at least `capacity` items, reallocating to exactly that capacity
    /// if it is currently smaller. Never shrinks.
    ///
    /// # Errors
    ///
    /// Returns an error if the capacity exceeds [`max_size()`][Self::max_size] or the memory
    /// cannot be allocated. The container is unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloc_vec::AllocVec;
    ///
    /// let mut items = AllocVec::<u8>::new();
    /// items.reserve(10).unwrap();
    ///
    /// let before = items.data_mut();
    /// for i in 0..10 {
    ///     items.push(i).unwrap();
    /// }
    ///
    /// assert_eq!(items.data_mut(), before);
    /// ```
    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        // SAFETY: Exactly the first `len` slots are live.
        unsafe { self.buffer.reserve_exact(self.len, capacity) }
    }

    /// Reallocates so that the capacity equals the length, releasing the memory entirely if the
    /// container is empty. Does nothing if there is no unused capacity.
    ///
    /// # Errors
    ///
    /// Returns an error if the smaller block cannot be allocated. The container is unchanged in
    /// that case.
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        // SAFETY: Exactly the first `len` slots are live.
        unsafe { self.buffer.shrink_to_fit(self.len) }
    }

    /// Grows the buffer if needed so that `additional` more items fit, using amortized growth.
    pub(crate) fn grow_for(&mut self, additional: usize) -> Result<()> {
        // SAFETY: Exactly the first `len` slots are live.
        unsafe { self.buffer.grow_amortized(self.len, additional) }
    }

    /// Changes the length to `new_len`, appending clones of `value` or destroying items from
    /// the back as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if memory for the new items cannot be allocated. The container is
    /// unchanged in that case.
    pub fn resize(&mut self, new_len: usize, value: T) -> Result<()>
    where
        T: Clone,
    {
        self.resize_with(new_len, || value.clone())
    }

    /// Changes the length to `new_len`, appending default-constructed items or destroying items
    /// from the back as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if memory for the new items cannot be allocated. The container is
    /// unchanged in that case.
    pub fn resize_default(&mut self, new_len: usize) -> Result<()>
    where
        T: Default,
    {
        self.resize_with(new_len, T::default)
    }

    /// Changes the length to `new_len`, appending items produced by `f` or destroying items from
    /// the back as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if memory for the new items cannot be allocated. The container is
    /// unchanged in that case.
    pub fn resize_with<F>(&mut self, new_len: usize, mut f: F) -> Result<()>
    where
        F: FnMut() -> T,
    {
        let Some(additional) = new_len.checked_sub(self.len) else {
            self.truncate(new_len);
            return Ok(());
        };

        let end = self.len;
        self.insert_with(end, additional, || Some(f())).map(|_| ())
    }

    /// Destroys items from the back until at most `len` remain. Does nothing if the container is
    /// already that short.
    pub fn truncate(&mut self, len: usize) {
        let end = self.len;
        self.destroy_range(len, end);
    }

    /// Destroys every item. The capacity is unchanged.
    pub fn clear(&mut self) {
        let end = self.len;
        self.destroy_range(0, end);
    }

    /// Destroys the last item. Does nothing if the container is empty.
    pub fn pop_back(&mut self) {
        let end = self.len;
        self.destroy_range(end.saturating_sub(1), end);
    }

    /// Moves the last item out of the container, if any.
    ///
    /// The item leaves without being destroyed by the allocator; ownership passes to the caller.
    pub fn pop(&mut self) -> Option<T> {
        self.len = self.len.checked_sub(1)?;

        let slot = self.buffer.slot(self.len);

        // SAFETY: The slot was live and is now excluded from the live range, so it is read
        // exactly once.
        Some(unsafe { slot.read() })
    }

    /// The position of the first item (equal to [`end()`][Self::end] if empty).
    #[must_use]
    #[inline]
    pub fn begin(&self) -> Position {
        Position::new(0)
    }

    /// The position one past the last item.
    #[must_use]
    #[inline]
    pub fn end(&self) -> Position {
        Position::new(self.len)
    }

    /// Converts a pointer to one of the items (or to one past the last item) into a position.
    ///
    /// Returns `None` if the pointer does not refer to a slot of the live range or the end. For
    /// zero-sized items all slots share one address, so only the first position is reported.
    #[must_use]
    pub fn position_of(&self, item: *const T) -> Option<Position> {
        let start = self.buffer.as_ptr().cast_const();

        if start.is_null() {
            return None;
        }

        let offset = item.addr().checked_sub(start.addr())?;

        let Some(index) = offset.checked_div(size_of::<T>()) else {
            return (offset == 0).then_some(self.begin());
        };

        let is_aligned_to_slot = index
            .checked_mul(size_of::<T>())
            .is_some_and(|slot_offset| slot_offset == offset);

        (is_aligned_to_slot && index <= self.len).then_some(Position::new(index))
    }

    /// Iterates over the items from back to front.
    pub fn reverse_iter(&self) -> iter::Rev<slice::Iter<'_, T>> {
        self.as_slice().iter().rev()
    }

    /// Iterates mutably over the items from back to front.
    pub fn reverse_iter_mut(&mut self) -> iter::Rev<slice::IterMut<'_, T>> {
        self.as_mut_slice().iter_mut().rev()
    }
}

impl<T, A: Allocator> Drop for AllocVec<T, A> {
    fn drop(&mut self) {
        let was_empty = self.is_empty();

        self.clear();
        self.buffer.release();

        // We do this check at the end so we clean up the memory first. If we are already
        // panicking, we do not want to panic again because that would obscure the original panic.
        if self.drop_policy == DropPolicy::MustNotDropItems && !thread::panicking() {
            assert!(
                was_empty,
                "dropped a non-empty container of {} with a policy that says it must be empty when dropped",
                type_name::<T>()
            );
        }
    }
}

impl<T, A: Allocator + Default> Default for AllocVec<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T, A: Allocator> Deref for AllocVec<T, A> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, A: Allocator> DerefMut for AllocVec<T, A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T, A: Allocator> AsRef<[T]> for AllocVec<T, A> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator> AsMut<[T]> for AllocVec<T, A> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for AllocVec<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: PartialEq, A: Allocator, B: Allocator> PartialEq<AllocVec<T, B>> for AllocVec<T, A> {
    fn eq(&self, other: &AllocVec<T, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: Allocator> Eq for AllocVec<T, A> {}

impl<T, U, A: Allocator, const N: usize> PartialEq<[U; N]> for AllocVec<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, A: Allocator> PartialEq<[U]> for AllocVec<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Hash, A: Allocator> Hash for AllocVec<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T, A: Allocator> Extend<T> for AllocVec<T, A> {
    /// # Panics
    ///
    /// Panics if memory for the new items cannot be allocated.
    fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) {
        let items = items.into_iter();
        let (lower_bound, _) = items.size_hint();

        self.grow_for(lower_bound)
            .unwrap_or_else(|error| error.panic());

        for item in items {
            self.push(item).unwrap_or_else(|error| error.panic());
        }
    }
}

impl<'a, T: Copy + 'a, A: Allocator> Extend<&'a T> for AllocVec<T, A> {
    /// # Panics
    ///
    /// Panics if memory for the new items cannot be allocated.
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, items: I) {
        let items = items.into_iter();
        let (lower_bound, _) = items.size_hint();

        self.grow_for(lower_bound)
            .unwrap_or_else(|error| error.panic());

        for item in items {
            self.push(*item).unwrap_or_else(|error| error.panic());
        }
    }
}

impl<T> FromIterator<T> for AllocVec<T, Global> {
    /// # Panics
    ///
    /// Panics if memory for the items cannot be allocated.
    fn from_iter<I: IntoIterator<Item = T>>(items: I) -> Self {
        Self::from_iter_in(items, Global).unwrap_or_else(|error| error.panic())
    }
}

impl<T, const N: usize> From<[T; N]> for AllocVec<T, Global> {
    /// # Panics
    ///
    /// Panics if memory for the items cannot be allocated.
    fn from(items: [T; N]) -> Self {
        Self::from_iter_in(items, Global).unwrap_or_else(|error| error.panic())
    }
}
