//! Copying, moving and swapping contents between containers.
//!
//! These operations are where the allocator's [`Propagation`][crate::Propagation] policy comes
//! into play: depending on the policy and on whether the two allocators compare equal, storage is
//! either handed over wholesale or the items are transferred one by one into storage owned by the
//! receiving allocator.

use std::any::type_name;
use std::{iter, mem};

use tracing::debug;

use crate::allocator::allocators_equal;
use crate::{AllocVec, Allocator, RawBuffer, Result};

impl<T, A: Allocator> AllocVec<T, A> {
    /// Creates a copy of the container, with an allocator chosen by
    /// [`Allocator::select_on_copy()`]. The copy has capacity for exactly the current items.
    ///
    /// # Errors
    ///
    /// Returns an error if memory for the copy cannot be allocated.
    pub fn try_clone(&self) -> Result<Self>
    where
        T: Clone,
    {
        self.try_clone_in(self.allocator().select_on_copy())
    }

    /// Creates a copy of the container that obtains memory from `allocator`.
    ///
    /// # Errors
    ///
    /// Returns an error if memory for the copy cannot be allocated.
    pub fn try_clone_in<B: Allocator>(&self, allocator: B) -> Result<AllocVec<T, B>>
    where
        T: Clone,
    {
        let mut copy = AllocVec::from_slice_in(self.as_slice(), allocator)?;
        copy.drop_policy = self.drop_policy;

        Ok(copy)
    }

    /// Replaces the items with clones of the items of `source`.
    ///
    /// If the allocator [propagates][crate::Propagation] and the two allocators differ, the
    /// current storage is released and the container adopts a copy of the source's allocator
    /// first. Otherwise the existing storage is reused, growing to exactly the source's length if
    /// it is too small.
    ///
    /// Existing items are overwritten via [`Clone::clone_from()`], missing ones are created via
    /// [`Clone::clone()`] and surplus ones are destroyed.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot grow. The container is unchanged in that case,
    /// including its allocator and capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloc_vec::AllocVec;
    ///
    /// let source = AllocVec::from([1, 2, 3, 4, 5]);
    /// let mut target = AllocVec::from([9, 9, 9]);
    ///
    /// target.try_clone_from(&source).unwrap();
    ///
    /// assert_eq!(target, source);
    /// ```
    pub fn try_clone_from(&mut self, source: &Self) -> Result<()>
    where
        T: Clone,
    {
        let equal = allocators_equal(self.allocator(), source.allocator());

        if A::PROPAGATION.propagates(equal) {
            if equal {
                self.buffer.replace_allocator(source.allocator().clone());
            } else {
                // The replacement block must exist before the current items are let go of.
                let storage =
                    RawBuffer::with_capacity_in(source.len(), source.allocator().clone())?;

                debug!(
                    item_type = type_name::<T>(),
                    len = self.len,
                    "copy assignment adopts an unequal allocator, releasing current storage"
                );

                self.clear();

                // Dropping the old buffer returns its block to the old allocator.
                self.buffer = storage;
            }
        }

        self.assign_slice(source.as_slice())
    }

    /// Replaces the items with clones of the items in `items`.
    ///
    /// Existing items are overwritten via [`Clone::clone_from()`], missing ones are created via
    /// [`Clone::clone()`] and surplus ones are destroyed.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot grow. The container is unchanged in that case.
    pub fn assign_slice(&mut self, items: &[T]) -> Result<()>
    where
        T: Clone,
    {
        self.assign_cloned(items.iter())
    }

    /// Replaces the items with `count` clones of `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot grow. The container is unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloc_vec::AllocVec;
    ///
    /// let mut items = AllocVec::from([1, 2, 3]);
    ///
    /// items.assign_fill(2, &7).unwrap();
    ///
    /// assert_eq!(items, [7, 7]);
    /// ```
    pub fn assign_fill(&mut self, count: usize, value: &T) -> Result<()>
    where
        T: Clone,
    {
        self.assign_cloned(iter::repeat_n(value, count))
    }

    /// Replaces the items with the items of `items`.
    ///
    /// Existing items are overwritten by plain assignment, further items are appended and surplus
    /// items are destroyed.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot grow. The items assigned so far stay in place.
    pub fn assign_iter<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        let mut items = items.into_iter();

        let assigned = self
            .as_mut_slice()
            .iter_mut()
            .zip(items.by_ref())
            .map(|(slot, item)| *slot = item)
            .count();

        self.truncate(assigned);

        for item in items {
            self.push(item)?;
        }

        Ok(())
    }

    fn assign_cloned<'a, I>(&mut self, items: I) -> Result<()>
    where
        I: ExactSizeIterator<Item = &'a T>,
        T: Clone + 'a,
    {
        let mut items = items;
        let count = items.len();

        self.reserve(count)?;
        self.truncate(count);

        // The live slots come first in the zip so that no source item is consumed once they run
        // out.
        for (slot, item) in self.as_mut_slice().iter_mut().zip(items.by_ref()) {
            slot.clone_from(item);
        }

        let remaining = count.saturating_sub(self.len);

        for item in items.take(remaining) {
            let next = self.len;

            // SAFETY: We reserved `count` slots and construct at most `count - len` more items.
            unsafe {
                self.construct_at(next, item.clone());
            }
        }

        Ok(())
    }

    /// Moves the contents out into a new container, leaving this one empty with no storage.
    ///
    /// The new container uses a clone of the allocator. No items are touched.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloc_vec::AllocVec;
    ///
    /// let mut source = AllocVec::from([1, 2, 3]);
    ///
    /// let target = source.take();
    ///
    /// assert_eq!(target, [1, 2, 3]);
    /// assert!(source.is_empty());
    /// assert_eq!(source.capacity(), 0);
    /// assert!(source.data().is_null());
    /// ```
    #[must_use]
    pub fn take(&mut self) -> Self {
        let mut target = Self::new_in(self.allocator().clone());
        target.drop_policy = self.drop_policy;
        self.hand_over(&mut target);

        target
    }

    /// Moves the contents out into a new container that uses `allocator`, leaving this one empty
    /// with no storage.
    ///
    /// If `allocator` equals the current allocator, the storage is handed over as is. Otherwise
    /// new storage is obtained from `allocator`, every item is moved into it through the new
    /// allocator and the old storage is released.
    ///
    /// # Errors
    ///
    /// Returns an error if the allocators differ and memory for the items cannot be obtained from
    /// `allocator`. This container is unchanged in that case.
    pub fn take_in(&mut self, allocator: A) -> Result<Self> {
        if allocators_equal(self.allocator(), &allocator) {
            let mut target = Self::new_in(allocator);
            target.drop_policy = self.drop_policy;
            self.hand_over(&mut target);

            return Ok(target);
        }

        debug!(
            item_type = type_name::<T>(),
            len = self.len,
            "moving items one by one into storage of an unequal allocator"
        );

        let mut target = Self::with_capacity_in(self.len, allocator)?;
        target.drop_policy = self.drop_policy;

        self.transfer_into(&mut target);
        self.buffer.release();

        Ok(target)
    }

    /// Replaces the contents with the contents of `source`, leaving `source` empty with no
    /// storage.
    ///
    /// * If the allocator [propagates][crate::Propagation], the current items are destroyed, the
    ///   current storage is released and both the source's storage and a copy of its allocator
    ///   are adopted.
    /// * Otherwise, if the two allocators compare equal, the current items are destroyed, the
    ///   current storage is released and the source's storage is adopted.
    /// * Otherwise the storage grows if needed, the current items are destroyed and the source's
    ///   items are moved in one by one through this container's allocator. The source's storage
    ///   is then released.
    ///
    /// # Errors
    ///
    /// Returns an error if the items must be moved one by one and the storage cannot grow to fit
    /// them. Both containers are unchanged in that case.
    pub fn move_from(&mut self, source: &mut Self) -> Result<()> {
        let equal = allocators_equal(self.allocator(), source.allocator());
        let propagates = A::PROPAGATION.propagates(equal);

        if propagates || equal {
            self.clear();
            self.buffer.release();

            if propagates {
                debug!(
                    item_type = type_name::<T>(),
                    allocators_equal = equal,
                    "move assignment adopts the source allocator"
                );

                self.buffer.replace_allocator(source.allocator().clone());
            }

            source.hand_over(self);
            return Ok(());
        }

        debug!(
            item_type = type_name::<T>(),
            len = source.len,
            "moving items one by one between unequal allocators"
        );

        self.reserve(source.len)?;
        self.clear();

        source.transfer_into(self);
        source.buffer.release();

        Ok(())
    }

    /// Exchanges the contents of two containers without touching any items.
    ///
    /// The allocators are exchanged as well if all instances of the allocator type are equal or
    /// if the allocator [propagates][crate::Propagation].
    ///
    /// # Panics
    ///
    /// Panics if the allocators compare unequal and do not propagate, since neither container
    /// could release the other's storage.
    pub fn swap(&mut self, other: &mut Self) {
        let equal = allocators_equal(self.allocator(), other.allocator());

        if A::ALWAYS_EQUAL || A::PROPAGATION.propagates(equal) {
            mem::swap(&mut self.buffer, &mut other.buffer);
        } else {
            assert!(
                equal,
                "cannot swap containers of {} whose allocators compare unequal and do not propagate",
                type_name::<T>()
            );

            self.buffer.swap_storage(&mut other.buffer);
        }

        mem::swap(&mut self.len, &mut other.len);
    }

    /// Gives our storage and items to an empty `target` whose allocator can release them.
    fn hand_over(&mut self, target: &mut Self) {
        debug_assert!(target.is_empty(), "target must be empty");
        debug_assert_eq!(target.capacity(), 0, "target must have no storage");

        self.buffer.swap_storage(&mut target.buffer);
        target.len = mem::take(&mut self.len);
    }

    /// Moves every item into `target` through the target's allocator, leaving this container with
    /// no live items but still holding its storage.
    ///
    /// Items are read out bitwise, so their old slots are simply forgotten. If the target's
    /// allocator panics while constructing, the items not yet moved are leaked.
    ///
    /// # Panics
    ///
    /// Panics if `target` does not have room for every item.
    fn transfer_into<B: Allocator>(&mut self, target: &mut AllocVec<T, B>) {
        let room = target.capacity().wrapping_sub(target.len);

        assert!(
            room >= self.len,
            "transfer of {} items of {} into a container with room for {room}",
            self.len,
            type_name::<T>()
        );

        let count = mem::take(&mut self.len);

        for index in 0..count {
            let slot = self.buffer.slot(index);

            // SAFETY: The slot was live and we already excluded every slot from the live range,
            // so each item is read exactly once and never destroyed here.
            let item = unsafe { slot.read() };

            let next = target.len;

            // SAFETY: We asserted above that the target has room for every item.
            unsafe {
                target.construct_at(next, item);
            }
        }
    }
}

impl<T: Clone, A: Allocator> Clone for AllocVec<T, A> {
    /// # Panics
    ///
    /// Panics if memory for the copy cannot be allocated.
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|error| error.panic())
    }

    /// # Panics
    ///
    /// Panics if the storage cannot grow to fit the source's items.
    fn clone_from(&mut self, source: &Self) {
        self.try_clone_from(source)
            .unwrap_or_else(|error| error.panic());
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use crate::testing::{Always, IfUnequal, Never, Tally, Tracked, TrackingAllocator};
    use crate::{AllocVec, DropPolicy, Error, Global};

    fn tracked(values: &[u32], tally: &std::rc::Rc<Tally>) -> AllocVec<Tracked> {
        values.iter().map(|value| Tracked::new(*value, tally)).collect()
    }

    fn values<A: crate::Allocator>(items: &AllocVec<Tracked, A>) -> Vec<u32> {
        items.iter().map(|item| item.value).collect()
    }

    #[test]
    fn clone_does_not_alias() {
        let original = AllocVec::from([1, 2, 3]);
        let mut copy = original.clone();

        assert_eq!(copy, original);
        assert_ne!(copy.data(), original.data());

        copy[0] = 100;

        assert_eq!(original, [1, 2, 3]);
        assert_eq!(copy, [100, 2, 3]);
    }

    #[test]
    fn clone_has_exact_capacity() {
        let mut original = AllocVec::<i32>::with_capacity(10).unwrap();
        original.extend([1, 2, 3]);

        let copy = original.try_clone().unwrap();

        assert_eq!(copy.capacity(), 3);
    }

    #[test]
    fn clone_keeps_drop_policy() {
        let original = AllocVec::<u8>::builder()
            .drop_policy(DropPolicy::MustNotDropItems)
            .build()
            .unwrap();

        let copy = original.try_clone().unwrap();

        assert_eq!(copy.drop_policy(), DropPolicy::MustNotDropItems);
        assert!(original.is_empty());
    }

    #[test]
    fn clone_in_uses_given_allocator() {
        let allocator = TrackingAllocator::<Never>::with_id(7);
        let original = AllocVec::from([1, 2]);

        let copy = original.try_clone_in(allocator.clone()).unwrap();

        assert_eq!(copy, [1, 2]);
        assert_eq!(copy.allocator().id(), 7);
        assert_eq!(allocator.stats().constructs, 2);
    }

    #[test]
    fn clone_from_longer_source_mixes_assign_and_construct() {
        let tally = Tally::new();
        let source = tracked(&[1, 2, 3, 4, 5], &tally);
        let mut target = tracked(&[9, 9, 9], &tally);

        target.clone_from(&source);

        assert_eq!(values(&target), [1, 2, 3, 4, 5]);
        assert_eq!(tally.clone_froms(), 3);
        assert_eq!(tally.clones(), 2);
        assert_eq!(target.capacity(), 5);
    }

    #[test]
    fn clone_from_shorter_source_destroys_surplus() {
        let tally = Tally::new();
        let source = tracked(&[1, 2], &tally);
        let mut target = tracked(&[9, 9, 9, 9], &tally);

        target.try_clone_from(&source).unwrap();

        assert_eq!(values(&target), [1, 2]);
        assert_eq!(tally.clone_froms(), 2);
        assert_eq!(tally.clones(), 0);
        assert_eq!(tally.drops(), 2);
        assert_eq!(target.capacity(), 4);
    }

    #[test]
    fn clone_from_with_propagating_unequal_allocators_adopts_source_allocator() {
        let old = TrackingAllocator::<Always>::with_id(1);
        let new = TrackingAllocator::<Always>::with_id(2);

        let source = AllocVec::from_slice_in(&[1, 2, 3], new.clone()).unwrap();
        let mut target = AllocVec::from_slice_in(&[7, 8], old.clone()).unwrap();

        target.try_clone_from(&source).unwrap();

        assert_eq!(target, [1, 2, 3]);
        assert_eq!(target.allocator().id(), 2);

        // The old storage went back to the old allocator, the new storage came from the new one.
        assert_eq!(old.stats().allocations, old.stats().deallocations);
        assert_eq!(old.stats().destroys, 2);
        assert_eq!(new.stats().allocations, 2);
        assert_eq!(target.capacity(), 3);
    }

    #[test]
    fn clone_from_with_unequal_allocator_failure_keeps_target_intact() {
        let old = TrackingAllocator::<Always>::with_id(1);
        let new = TrackingAllocator::<Always>::with_id(2);

        let source = AllocVec::from_slice_in(&[1, 2], new.clone()).unwrap();
        let mut target = AllocVec::from_slice_in(&[7, 8, 9], old.clone()).unwrap();

        new.fail_next_allocation();
        let result = target.try_clone_from(&source);

        assert!(matches!(result, Err(Error::AllocationFailed { .. })));
        assert_eq!(target, [7, 8, 9]);
        assert_eq!(target.len(), 3);
        assert_eq!(target.capacity(), 3);
        assert_eq!(target.allocator().id(), 1);
        assert_eq!(old.stats().destroys, 0);
        assert_eq!(old.stats().deallocations, 0);
    }

    #[test]
    fn clone_from_without_propagation_keeps_allocator() {
        let own = TrackingAllocator::<Never>::with_id(1);
        let other = TrackingAllocator::<Never>::with_id(2);

        let source = AllocVec::from_slice_in(&[1, 2, 3], other.clone()).unwrap();
        let mut target = AllocVec::with_capacity_in(8, own.clone()).unwrap();
        target.push(0).unwrap();

        target.try_clone_from(&source).unwrap();

        assert_eq!(target, [1, 2, 3]);
        assert_eq!(target.allocator().id(), 1);
        assert_eq!(target.capacity(), 8);
        assert_eq!(own.stats().allocations, 1);
    }

    #[test]
    fn clone_from_if_unequal_with_equal_allocators_reuses_storage() {
        let allocator = TrackingAllocator::<IfUnequal>::with_id(1);

        let source = AllocVec::from_slice_in(&[1, 2], allocator.clone()).unwrap();
        let mut target = AllocVec::from_slice_in(&[5, 6, 7], allocator.clone()).unwrap();
        let before = target.data();

        target.try_clone_from(&source).unwrap();

        assert_eq!(target, [1, 2]);
        assert_eq!(target.data(), before);
    }

    #[test]
    fn assign_fill_and_iter() {
        let mut items = AllocVec::from([1, 2, 3]);

        items.assign_fill(5, &4).unwrap();
        assert_eq!(items, [4, 4, 4, 4, 4]);

        items.assign_iter([1, 2]).unwrap();
        assert_eq!(items, [1, 2]);

        items.assign_iter(10..14).unwrap();
        assert_eq!(items, [10, 11, 12, 13]);

        items.assign_slice(&[]).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn assign_slice_failure_leaves_items() {
        let allocator = TrackingAllocator::<Never>::new();
        let mut items = AllocVec::from_slice_in(&[1, 2], allocator.clone()).unwrap();

        allocator.fail_next_allocation();
        let result = items.assign_slice(&[5, 6, 7]);

        assert!(matches!(result, Err(Error::AllocationFailed { .. })));
        assert_eq!(items, [1, 2]);
    }

    #[test]
    fn take_leaves_source_empty() {
        let mut source = AllocVec::from([1, 2, 3]);
        let data = source.data();

        let target = source.take();

        assert_eq!(target, [1, 2, 3]);
        assert_eq!(target.data(), data);
        assert!(source.is_empty());
        assert_eq!(source.capacity(), 0);
        assert!(source.data().is_null());
    }

    #[test]
    fn take_in_equal_allocator_steals_storage() {
        let allocator = TrackingAllocator::<Never>::with_id(3);
        let mut source = AllocVec::from_slice_in(&[1, 2], allocator.clone()).unwrap();
        let data = source.data();

        let target = source.take_in(allocator.clone()).unwrap();

        assert_eq!(target.data(), data);
        assert_eq!(allocator.stats().allocations, 1);
        assert_eq!(source.capacity(), 0);
    }

    #[test]
    fn take_in_unequal_allocator_moves_items() {
        let tally = Tally::new();
        let old = TrackingAllocator::<Never>::with_id(1);
        let new = TrackingAllocator::<Never>::with_id(2);

        let mut source = AllocVec::new_in(old.clone());
        for value in [1, 2, 3] {
            source.push(Tracked::new(value, &tally)).unwrap();
        }

        let target = source.take_in(new.clone()).unwrap();

        assert_eq!(values(&target), [1, 2, 3]);
        assert_eq!(target.allocator().id(), 2);
        assert_eq!(new.stats().constructs, 3);
        assert_eq!(old.stats().allocations, old.stats().deallocations);
        assert_eq!(old.stats().destroys, 0);
        assert_eq!(tally.drops(), 0);
        assert_eq!(tally.clones(), 0);
        assert_eq!(source.capacity(), 0);
    }

    #[test]
    fn move_from_with_propagation_adopts_allocator_and_storage() {
        let own = TrackingAllocator::<Always>::with_id(1);
        let other = TrackingAllocator::<Always>::with_id(2);

        let mut target = AllocVec::from_slice_in(&[9, 9], own.clone()).unwrap();
        let mut source = AllocVec::from_slice_in(&[1, 2, 3], other.clone()).unwrap();
        let data = source.data();

        target.move_from(&mut source).unwrap();

        assert_eq!(target, [1, 2, 3]);
        assert_eq!(target.data(), data);
        assert_eq!(target.allocator().id(), 2);
        assert_eq!(own.stats().allocations, own.stats().deallocations);
        assert!(source.is_empty());
        assert_eq!(source.capacity(), 0);
    }

    #[test]
    fn move_from_with_equal_allocators_adopts_storage() {
        let allocator = TrackingAllocator::<Never>::with_id(1);

        let mut target = AllocVec::from_slice_in(&[9, 9], allocator.clone()).unwrap();
        let mut source = AllocVec::from_slice_in(&[1, 2, 3], allocator.clone()).unwrap();
        let data = source.data();

        target.move_from(&mut source).unwrap();

        assert_eq!(target, [1, 2, 3]);
        assert_eq!(target.data(), data);
        assert_eq!(allocator.stats().destroys, 2);
        assert_eq!(allocator.stats().constructs, 5);
        assert!(source.data().is_null());
    }

    #[test]
    fn move_from_with_unequal_allocators_moves_items() {
        let own = TrackingAllocator::<Never>::with_id(1);
        let other = TrackingAllocator::<Never>::with_id(2);

        let mut target = AllocVec::from_slice_in(&[9], own.clone()).unwrap();
        let mut source = AllocVec::from_slice_in(&[1, 2, 3], other.clone()).unwrap();

        target.move_from(&mut source).unwrap();

        assert_eq!(target, [1, 2, 3]);
        assert_eq!(target.allocator().id(), 1);
        assert_eq!(target.capacity(), 3);
        assert_eq!(own.stats().constructs, 4);
        assert_eq!(own.stats().destroys, 1);
        assert_eq!(other.stats().allocations, other.stats().deallocations);
        assert!(source.is_empty());
        assert_eq!(source.capacity(), 0);
    }

    #[test]
    fn move_from_with_unequal_allocators_fails_before_touching_items() {
        let own = TrackingAllocator::<Never>::with_id(1);
        let other = TrackingAllocator::<Never>::with_id(2);

        let mut target = AllocVec::from_slice_in(&[9], own.clone()).unwrap();
        let mut source = AllocVec::from_slice_in(&[1, 2, 3], other.clone()).unwrap();

        own.fail_next_allocation();
        let result = target.move_from(&mut source);

        assert!(matches!(result, Err(Error::AllocationFailed { .. })));
        assert_eq!(target, [9]);
        assert_eq!(source, [1, 2, 3]);
    }

    #[test]
    fn swap_exchanges_contents() {
        let mut a = AllocVec::from([1, 2]);
        let mut b = AllocVec::<i32, Global>::new();

        a.swap(&mut b);

        assert!(a.is_empty());
        assert_eq!(b, [1, 2]);
    }

    #[test]
    fn swap_with_equal_non_propagating_allocators_keeps_allocators() {
        let allocator = TrackingAllocator::<Never>::with_id(5);

        let mut a = AllocVec::from_slice_in(&[1], allocator.clone()).unwrap();
        let mut b = AllocVec::from_slice_in(&[2, 3], allocator.clone()).unwrap();

        a.swap(&mut b);

        assert_eq!(a, [2, 3]);
        assert_eq!(b, [1]);
    }

    #[test]
    fn swap_with_propagating_allocators_exchanges_allocators() {
        let mut a =
            AllocVec::from_slice_in(&[1], TrackingAllocator::<Always>::with_id(1)).unwrap();
        let mut b =
            AllocVec::from_slice_in(&[2], TrackingAllocator::<Always>::with_id(2)).unwrap();

        a.swap(&mut b);

        assert_eq!(a, [2]);
        assert_eq!(a.allocator().id(), 2);
        assert_eq!(b.allocator().id(), 1);
    }

    #[test]
    fn swap_with_unequal_non_propagating_allocators_panics() {
        let mut a =
            AllocVec::from_slice_in(&[1], TrackingAllocator::<Never>::with_id(1)).unwrap();
        let mut b =
            AllocVec::from_slice_in(&[2], TrackingAllocator::<Never>::with_id(2)).unwrap();

        let result = catch_unwind(AssertUnwindSafe(|| a.swap(&mut b)));

        assert!(result.is_err());
        assert_eq!(a, [1]);
        assert_eq!(b, [2]);
    }

    #[test]
    fn panicking_clone_during_copy_leaks_nothing() {
        let tally = Tally::new();
        let source = tracked(&[1, 2, 3], &tally);

        tally.panic_after_clones(1);
        let result = catch_unwind(AssertUnwindSafe(|| source.clone()));

        assert!(result.is_err());
        // The one clone that succeeded was dropped with the partial copy.
        assert_eq!(tally.drops(), 1);
        assert_eq!(values(&source), [1, 2, 3]);
    }
}
