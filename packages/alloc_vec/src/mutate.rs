//! Insertion and removal at arbitrary positions.
//!
//! Every insertion funnels through one routine that grows the buffer for the whole incoming count,
//! shifts the tail once to open a gap and then constructs the new items into the gap one by one.
//! If producing an item panics, a guard moves the tail back to close whatever remains of the gap.

use std::any::type_name;
use std::ptr;

use crate::{AllocVec, Allocator, Error, Position, Result};

impl<T, A: Allocator> AllocVec<T, A> {
    /// Opens a gap of `count` slots at `index` and fills it with items from `produce`, stopping
    /// early if `produce` runs dry. Returns the position of the first new item.
    ///
    /// Growth happens before anything is shifted, so an allocation failure leaves the container
    /// unchanged. A panic in `produce` keeps the items constructed so far and closes the gap.
    pub(crate) fn insert_with<F>(
        &mut self,
        index: usize,
        count: usize,
        mut produce: F,
    ) -> Result<Position>
    where
        F: FnMut() -> Option<T>,
    {
        assert!(
            index <= self.len,
            "insertion position {index} is beyond the end of a container of {} with length {}",
            type_name::<T>(),
            self.len
        );

        if count == 0 {
            return Ok(Position::new(index));
        }

        self.grow_for(count)?;

        let tail = self.len.wrapping_sub(index);
        let tail_start = index
            .checked_add(count)
            .expect("guarded by len + count <= capacity");

        if tail > 0 {
            let source = self.buffer.slot(index);
            let destination = self.buffer.slot(tail_start);

            // SAFETY: Both ranges lie within the capacity since `len + count <= capacity`. The
            // ranges may overlap, which `copy` permits. The vacated slots are excluded from the
            // live range on the next line, so nothing is observed twice.
            unsafe {
                ptr::copy(source.as_ptr(), destination.as_ptr(), tail);
            }
        }

        self.len = index;

        let mut gap = scopeguard::guard(self, |vec| {
            // SAFETY: The tail was parked at `tail_start` above and every constructed item went
            // into the gap in front of it.
            unsafe {
                vec.close_gap(tail_start, tail);
            }
        });

        for _ in 0..count {
            let Some(value) = produce() else {
                break;
            };

            let next = gap.len;

            // SAFETY: The gap ends at `tail_start <= capacity`, and we construct at most `count`
            // items into it.
            unsafe {
                gap.construct_at(next, value);
            }
        }

        Ok(Position::new(index))
    }

    /// Moves the `tail` items parked at `tail_start` down to the end of the live range and counts
    /// them as live again.
    ///
    /// # Safety
    ///
    /// The slots `tail_start..tail_start + tail` must hold live items that are not counted in the
    /// length, and every slot between the length and `tail_start` must be uninitialized.
    unsafe fn close_gap(&mut self, tail_start: usize, tail: usize) {
        if tail > 0 && self.len != tail_start {
            let source = self.buffer.slot(tail_start);
            let destination = self.buffer.slot(self.len);

            // SAFETY: Both ranges are within the capacity; `copy` permits the overlap.
            unsafe {
                ptr::copy(source.as_ptr(), destination.as_ptr(), tail);
            }
        }

        self.len = self
            .len
            .checked_add(tail)
            .expect("guarded by len + tail <= capacity");
    }

    /// Inserts the item produced by `f` at `position`, shifting later items back by one.
    ///
    /// Returns the position of the new item.
    ///
    /// # Errors
    ///
    /// Returns an error if the container is full and cannot grow. `f` is not called and the
    /// container is unchanged in that case.
    ///
    /// # Panics
    ///
    /// Panics if `position` is beyond [`end()`][Self::end]. If `f` panics, the container keeps
    /// its original items in their original order.
    pub fn emplace_with<F>(&mut self, position: Position, f: F) -> Result<Position>
    where
        F: FnOnce() -> T,
    {
        let mut f = Some(f);

        self.insert_with(position.index(), 1, || f.take().map(|f| f()))
    }

    /// Inserts `value` at `position`, shifting later items back by one.
    ///
    /// Returns the position of the new item.
    ///
    /// # Errors
    ///
    /// Returns an error if the container is full and cannot grow. The container is unchanged in
    /// that case.
    ///
    /// # Panics
    ///
    /// Panics if `position` is beyond [`end()`][Self::end].
    pub fn emplace(&mut self, position: Position, value: T) -> Result<Position> {
        self.emplace_with(position, || value)
    }

    /// Inserts `value` at `position`, shifting later items back by one.
    ///
    /// Returns the position of the new item.
    ///
    /// # Errors
    ///
    /// Returns an error if the container is full and cannot grow. The container is unchanged in
    /// that case.
    ///
    /// # Panics
    ///
    /// Panics if `position` is beyond [`end()`][Self::end].
    ///
    /// # Examples
    ///
    /// ```
    /// use alloc_vec::AllocVec;
    ///
    /// let mut items = AllocVec::from([1, 3]);
    ///
    /// let inserted = items.insert(items.begin() + 1, 2).unwrap();
    ///
    /// assert_eq!(inserted.index(), 1);
    /// assert_eq!(items, [1, 2, 3]);
    /// ```
    pub fn insert(&mut self, position: Position, value: T) -> Result<Position> {
        self.emplace(position, value)
    }

    /// Appends `value` to the back.
    ///
    /// # Errors
    ///
    /// Returns an error if the container is full and cannot grow. The container is unchanged in
    /// that case.
    #[inline]
    pub fn push(&mut self, value: T) -> Result<()> {
        self.emplace_back(value).map(|_| ())
    }

    /// Appends `value` to the back. Same as [`push()`][Self::push].
    ///
    /// # Errors
    ///
    /// Returns an error if the container is full and cannot grow. The container is unchanged in
    /// that case.
    #[inline]
    pub fn push_back(&mut self, value: T) -> Result<()> {
        self.push(value)
    }

    /// Appends `value` to the back and returns a reference to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the container is full and cannot grow. The container is unchanged in
    /// that case.
    pub fn emplace_back(&mut self, value: T) -> Result<&mut T> {
        self.emplace_back_with(|| value)
    }

    /// Appends the item produced by `f` to the back and returns a reference to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the container is full and cannot grow. `f` is not called and the
    /// container is unchanged in that case.
    pub fn emplace_back_with<F>(&mut self, f: F) -> Result<&mut T>
    where
        F: FnOnce() -> T,
    {
        let end = self.end();
        self.emplace_with(end, f)?;

        Ok(self
            .back_mut()
            .expect("we just appended an item, so there must be a last item"))
    }

    /// Inserts `count` clones of `value` at `position`.
    ///
    /// Returns the position of the first inserted item (`position` itself if `count` is zero).
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot grow to fit the new items. The container is
    /// unchanged in that case.
    ///
    /// # Panics
    ///
    /// Panics if `position` is beyond [`end()`][Self::end]. If cloning panics, the clones made so
    /// far stay in the container.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloc_vec::AllocVec;
    ///
    /// let mut items = AllocVec::from([1, 2]);
    ///
    /// items.insert_n(items.begin(), 3, &7).unwrap();
    ///
    /// assert_eq!(items, [7, 7, 7, 1, 2]);
    /// ```
    pub fn insert_n(&mut self, position: Position, count: usize, value: &T) -> Result<Position>
    where
        T: Clone,
    {
        self.insert_with(position.index(), count, || Some(value.clone()))
    }

    /// Inserts the items of `items` at `position`, in order.
    ///
    /// The iterator must report its exact length up front. If it yields fewer items than it
    /// reported, only those are inserted; surplus items are not consumed.
    ///
    /// Returns the position of the first inserted item.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot grow to fit the new items. The container is
    /// unchanged in that case.
    ///
    /// # Panics
    ///
    /// Panics if `position` is beyond [`end()`][Self::end]. If the iterator panics, the items
    /// inserted so far stay in the container.
    pub fn insert_iter<I>(&mut self, position: Position, items: I) -> Result<Position>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let mut items = items.into_iter();
        let count = items.len();

        self.insert_with(position.index(), count, || items.next())
    }

    /// Inserts clones of the items in `items` at `position`, in order.
    ///
    /// Returns the position of the first inserted item.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot grow to fit the new items. The container is
    /// unchanged in that case.
    ///
    /// # Panics
    ///
    /// Panics if `position` is beyond [`end()`][Self::end]. If cloning panics, the clones made so
    /// far stay in the container.
    pub fn insert_slice(&mut self, position: Position, items: &[T]) -> Result<Position>
    where
        T: Clone,
    {
        self.insert_iter(position, items.iter().cloned())
    }

    /// Destroys the item at `position` and closes the gap.
    ///
    /// Returns the position of the item that followed the erased one, which is now at the same
    /// index (or [`end()`][Self::end] if the last item was erased).
    ///
    /// # Panics
    ///
    /// Panics if `position` does not refer to an item.
    pub fn erase(&mut self, position: Position) -> Position {
        let index = position.index();

        assert!(
            index < self.len,
            "erase position {index} does not refer to an item in a container of {} with length {}",
            type_name::<T>(),
            self.len
        );

        self.destroy_range(
            index,
            index.checked_add(1).expect("guarded by index < len"),
        );

        position
    }

    /// Destroys the items in `first..last` and closes the gap.
    ///
    /// Returns the position following the removed range, which is now at index `first`. An empty
    /// range removes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] if `first` is after `last` or `last` is beyond
    /// [`end()`][Self::end]. Nothing is removed in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloc_vec::AllocVec;
    ///
    /// let mut items = AllocVec::from([1, 2, 3, 4, 5]);
    ///
    /// let next = items.erase_range(items.begin() + 1, items.begin() + 3).unwrap();
    ///
    /// assert_eq!(next.index(), 1);
    /// assert_eq!(items, [1, 4, 5]);
    ///
    /// assert!(items.erase_range(items.begin() + 2, items.begin() + 1).is_err());
    /// ```
    pub fn erase_range(&mut self, first: Position, last: Position) -> Result<Position> {
        let (first, last) = (first.index(), last.index());

        if first > last || last > self.len {
            return Err(Error::InvalidRange {
                first,
                last,
                len: self.len,
            });
        }

        self.destroy_range(first, last);

        Ok(Position::new(first))
    }
}
