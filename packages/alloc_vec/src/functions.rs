use crate::{AllocVec, Allocator, Error, Position, Result};

/// Exchanges the contents of two containers. Same as [`AllocVec::swap()`].
///
/// # Panics
///
/// Panics if the allocators compare unequal and do not propagate.
pub fn swap<T, A: Allocator>(left: &mut AllocVec<T, A>, right: &mut AllocVec<T, A>) {
    left.swap(right);
}

/// Removes every item equal to `value`, keeping the order of the remaining items.
///
/// Returns the number of items removed.
///
/// # Examples
///
/// ```
/// use alloc_vec::AllocVec;
///
/// let mut items = AllocVec::from([1, 2, 1, 3, 1]);
///
/// assert_eq!(alloc_vec::erase(&mut items, &1), 3);
/// assert_eq!(items, [2, 3]);
/// ```
pub fn erase<T: PartialEq, A: Allocator>(items: &mut AllocVec<T, A>, value: &T) -> usize {
    erase_if(items, |item| item == value)
}

/// Removes every item for which `predicate` returns `true`, keeping the order of the remaining
/// items.
///
/// Survivors are first moved to the front in their original order, then the removed items are
/// destroyed from the back. If `predicate` panics, no item is lost but the items may be left
/// reordered.
///
/// Returns the number of items removed.
///
/// # Examples
///
/// ```
/// use alloc_vec::AllocVec;
///
/// let mut items = AllocVec::from([1, 2, 3, 4, 5, 6]);
///
/// let removed = alloc_vec::erase_if(&mut items, |item| item % 2 == 0);
///
/// assert_eq!(removed, 3);
/// assert_eq!(items, [1, 3, 5]);
/// ```
pub fn erase_if<T, A, F>(items: &mut AllocVec<T, A>, predicate: F) -> usize
where
    A: Allocator,
    F: FnMut(&T) -> bool,
{
    let len = items.len();
    let kept = keep_to_front(items.as_mut_slice(), predicate);

    items.truncate(kept);

    len.wrapping_sub(kept)
}

/// Removes every item in `first..last` for which `predicate` returns `true`, keeping the order of
/// all remaining items. Items outside the range are not visited.
///
/// Returns the number of items removed.
///
/// # Errors
///
/// Returns [`Error::InvalidRange`] if `first` is after `last` or `last` is beyond
/// [`AllocVec::end()`]. Nothing is visited or removed in that case.
///
/// # Examples
///
/// ```
/// use alloc_vec::AllocVec;
///
/// let mut items = AllocVec::from([2, 4, 5, 6, 8]);
///
/// let (first, last) = (items.begin() + 1, items.end() - 1);
///
/// let removed = alloc_vec::erase_range_if(&mut items, first, last, |item| item % 2 == 0);
///
/// assert_eq!(removed.unwrap(), 2);
/// assert_eq!(items, [2, 5, 8]);
/// ```
pub fn erase_range_if<T, A, F>(
    items: &mut AllocVec<T, A>,
    first: Position,
    last: Position,
    predicate: F,
) -> Result<usize>
where
    A: Allocator,
    F: FnMut(&T) -> bool,
{
    let (start, end) = (first.index(), last.index());
    let len = items.len();

    let Some(range) = items.as_mut_slice().get_mut(start..end) else {
        return Err(Error::InvalidRange {
            first: start,
            last: end,
            len,
        });
    };

    let kept = keep_to_front(range, predicate);
    let removed = range.len().wrapping_sub(kept);

    items.erase_range(first + kept, last)?;

    Ok(removed)
}

/// Moves the items that `predicate` rejects to the front in their original order and returns how
/// many there are. Everything after them is to be removed.
fn keep_to_front<T, F>(slice: &mut [T], mut predicate: F) -> usize
where
    F: FnMut(&T) -> bool,
{
    let mut kept: usize = 0;

    for index in 0..slice.len() {
        let keep = slice.get(index).is_some_and(|item| !predicate(item));

        if keep {
            if kept != index {
                slice.swap(kept, index);
            }

            kept = kept.wrapping_add(1);
        }
    }

    kept
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;
    use crate::testing::{Never, Tally, Tracked, TrackingAllocator};

    #[test]
    fn erase_if_keeps_survivor_order() {
        let mut items = AllocVec::from([5, 8, 1, 6, 2, 9, 4]);

        let removed = erase_if(&mut items, |item| *item < 5);

        assert_eq!(removed, 3);
        assert_eq!(items, [5, 8, 6, 9]);
    }

    #[test]
    fn erase_if_destroys_removed_items_through_allocator() {
        let tally = Tally::new();
        let allocator = TrackingAllocator::<Never>::new();

        let mut items = AllocVec::new_in(allocator.clone());
        for value in 0..10 {
            items.push(Tracked::new(value, &tally)).unwrap();
        }

        let removed = erase_if(&mut items, |item| item.value % 3 == 0);

        assert_eq!(removed, 4);
        assert_eq!(tally.drops(), 4);
        assert_eq!(allocator.stats().destroys, 4);

        let values: Vec<_> = items.iter().map(|item| item.value).collect();
        assert_eq!(values, [1, 2, 4, 5, 7, 8]);
    }

    #[test]
    fn erase_nothing_found() {
        let mut items = AllocVec::from([1, 2, 3]);

        assert_eq!(erase(&mut items, &4), 0);
        assert_eq!(items, [1, 2, 3]);
    }

    #[test]
    fn erase_everything() {
        let mut items = AllocVec::from([7, 7, 7]);

        assert_eq!(erase(&mut items, &7), 3);
        assert!(items.is_empty());
        assert_eq!(items.capacity(), 3);
    }

    #[test]
    fn panicking_predicate_loses_nothing() {
        let tally = Tally::new();

        let mut items = AllocVec::new();
        for value in 0..5 {
            items.push(Tracked::new(value, &tally)).unwrap();
        }

        let result = catch_unwind(AssertUnwindSafe(|| {
            erase_if(&mut items, |item| {
                assert!(item.value < 3, "predicate failed on purpose");
                item.value == 1
            })
        }));

        assert!(result.is_err());
        assert_eq!(items.len(), 5);
        assert_eq!(tally.drops(), 0);
    }

    #[test]
    fn erase_range_if_leaves_outside_items_alone() {
        let mut items = AllocVec::from([0, 1, 2, 3, 4, 5, 6, 7]);
        let mut visited = Vec::new();
        let (first, last) = (items.begin() + 2, items.begin() + 6);

        let removed = erase_range_if(&mut items, first, last, |item| {
            visited.push(*item);
            item % 2 == 0
        })
        .unwrap();

        assert_eq!(removed, 2);
        assert_eq!(visited, [2, 3, 4, 5]);
        assert_eq!(items, [0, 1, 3, 5, 6, 7]);
    }

    #[test]
    fn erase_range_if_destroys_removed_items_through_allocator() {
        let tally = Tally::new();
        let allocator = TrackingAllocator::<Never>::new();

        let mut items = AllocVec::new_in(allocator.clone());
        for value in 0..6 {
            items.push(Tracked::new(value, &tally)).unwrap();
        }

        let (first, last) = (items.begin(), items.begin() + 4);

        let removed = erase_range_if(&mut items, first, last, |item| item.value != 2).unwrap();

        assert_eq!(removed, 3);
        assert_eq!(tally.drops(), 3);
        assert_eq!(allocator.stats().destroys, 3);

        let values: Vec<_> = items.iter().map(|item| item.value).collect();
        assert_eq!(values, [2, 4, 5]);
    }

    #[test]
    fn erase_range_if_rejects_bad_ranges() {
        let mut items = AllocVec::from([1, 2, 3]);

        let (begin, end) = (items.begin(), items.end());

        let inverted = erase_range_if(&mut items, begin + 2, begin + 1, |_| true);
        let beyond = erase_range_if(&mut items, begin, end + 1, |_| true);

        assert!(matches!(
            inverted,
            Err(Error::InvalidRange {
                first: 2,
                last: 1,
                len: 3
            })
        ));
        assert!(matches!(beyond, Err(Error::InvalidRange { last: 4, .. })));
        assert_eq!(items, [1, 2, 3]);
    }

    #[test]
    fn erase_range_if_empty_range_removes_nothing() {
        let mut items = AllocVec::from([1, 2, 3]);

        let end = items.end();

        let removed = erase_range_if(&mut items, end, end, |_| true).unwrap();

        assert_eq!(removed, 0);
        assert_eq!(items, [1, 2, 3]);
    }

    #[test]
    fn free_swap() {
        let mut a = AllocVec::from([1]);
        let mut b = AllocVec::from([2, 3]);

        swap(&mut a, &mut b);

        assert_eq!(a, [2, 3]);
        assert_eq!(b, [1]);
    }
}
