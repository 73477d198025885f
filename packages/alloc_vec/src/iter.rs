use std::iter::FusedIterator;
use std::{fmt, mem, slice};

use crate::{AllocVec, Allocator, Global, RawBuffer};

/// An iterator that moves the items out of an [`AllocVec`], front to back or back to front.
///
/// Items that are not consumed are destroyed through the allocator when the iterator is dropped,
/// after which the storage is released.
///
/// # Examples
///
/// ```
/// use alloc_vec::AllocVec;
///
/// let items = AllocVec::from(["a".to_string(), "b".to_string(), "c".to_string()]);
///
/// let mut iter = items.into_iter();
///
/// assert_eq!(iter.next().as_deref(), Some("a"));
/// assert_eq!(iter.next_back().as_deref(), Some("c"));
/// assert_eq!(iter.len(), 1);
/// ```
pub struct IntoIter<T, A: Allocator = Global> {
    buffer: RawBuffer<T, A>,

    // Slots `front..back` hold the items not yet yielded.
    front: usize,
    back: usize,
}

impl<T, A: Allocator> IntoIter<T, A> {
    /// The items not yet yielded, as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        if self.front == self.back {
            return &[];
        }

        let first = self.buffer.slot(self.front);

        // SAFETY: The slots `front..back` are live and within the buffer.
        unsafe { slice::from_raw_parts(first.as_ptr(), self.back.wrapping_sub(self.front)) }
    }

    /// The allocator that owns the storage of the remaining items.
    #[must_use]
    pub fn allocator(&self) -> &A {
        self.buffer.allocator()
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }

        let slot = self.buffer.slot(self.front);
        self.front = self.front.wrapping_add(1);

        // SAFETY: The slot was live and is now outside `front..back`, so it is read exactly once.
        Some(unsafe { slot.read() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back.wrapping_sub(self.front);
        (remaining, Some(remaining))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }

        self.back = self.back.wrapping_sub(1);
        let slot = self.buffer.slot(self.back);

        // SAFETY: The slot was live and is now outside `front..back`, so it is read exactly once.
        Some(unsafe { slot.read() })
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        while self.front != self.back {
            let slot = self.buffer.slot(self.front);
            self.front = self.front.wrapping_add(1);

            // SAFETY: The slot was live and is now outside `front..back`, so it is destroyed
            // exactly once.
            unsafe {
                self.buffer.allocator().destroy(slot);
            }
        }

        // The buffer releases the storage when it is dropped.
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, A: Allocator> IntoIterator for AllocVec<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(mut self) -> Self::IntoIter {
        let mut buffer = RawBuffer::new_in(self.allocator().clone());
        buffer.swap_storage(&mut self.buffer);

        let back = mem::take(&mut self.len);

        // `self` is now empty and without storage, so dropping it is a no-op even under
        // `DropPolicy::MustNotDropItems`.
        IntoIter {
            buffer,
            front: 0,
            back,
        }
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a AllocVec<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut AllocVec<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}
