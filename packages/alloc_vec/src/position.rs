use std::ops::{Add, Sub};

/// A position within an [`AllocVec`][crate::AllocVec], identifying either an item or the
/// one-past-the-end location.
///
/// Positions are plain indices. Unlike pointers they stay meaningful across reallocation, though
/// they still shift when items are inserted or erased before them.
///
/// # Examples
///
/// ```
/// use alloc_vec::AllocVec;
///
/// let mut items = AllocVec::from([1, 2, 3]);
///
/// let next = items.erase(items.begin() + 1);
///
/// assert_eq!(next.index(), 1);
/// assert_eq!(items, [1, 3]);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Position {
    index: usize,
}

impl Position {
    /// Creates a position referring to the given index.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self { index }
    }

    /// The index this position refers to.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.index
    }
}

impl From<usize> for Position {
    #[inline]
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl From<Position> for usize {
    #[inline]
    fn from(position: Position) -> Self {
        position.index
    }
}

impl Add<usize> for Position {
    type Output = Self;

    #[inline]
    fn add(self, rhs: usize) -> Self::Output {
        Self::new(
            self.index
                .checked_add(rhs)
                .expect("position arithmetic moved beyond the addressable range"),
        )
    }
}

impl Sub<usize> for Position {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: usize) -> Self::Output {
        Self::new(
            self.index
                .checked_sub(rhs)
                .expect("position arithmetic moved before the first item"),
        )
    }
}

impl Sub for Position {
    type Output = usize;

    /// The distance from `rhs` to `self`.
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.index
            .checked_sub(rhs.index)
            .expect("distance between positions must not be negative")
    }
}
