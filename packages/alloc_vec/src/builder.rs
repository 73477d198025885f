use std::any::type_name;
use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;

use crate::{AllocVec, Allocator, DropPolicy, Global, RawBuffer, Result};

/// Builder for creating an instance of [`AllocVec`].
///
/// All settings are optional. Without any, the builder creates an empty container using the
/// [`Global`] allocator, the same as [`AllocVec::new()`].
///
/// # Examples
///
/// ```
/// use alloc_vec::{AllocVec, DropPolicy, Global};
///
/// let items = AllocVec::<u64>::builder()
///     .allocator(Global)
///     .capacity(100)
///     .drop_policy(DropPolicy::MustNotDropItems)
///     .build()
///     .unwrap();
///
/// assert_eq!(items.capacity(), 100);
/// ```
///
/// # Thread safety
///
/// The builder is thread-mobile ([`Send`]) if the allocator is, allowing the container to be
/// configured on a different thread than where it is used. It is not thread-safe ([`Sync`]).
#[must_use]
pub struct AllocVecBuilder<T, A: Allocator = Global> {
    allocator: A,
    capacity: usize,
    drop_policy: DropPolicy,

    _item: PhantomData<fn() -> T>,

    // Prevents Sync while allowing Send - builders are thread-mobile but not thread-safe
    _not_sync: PhantomData<Cell<()>>,
}

impl<T> AllocVecBuilder<T, Global> {
    #[inline]
    pub(crate) fn new() -> Self {
        Self {
            allocator: Global,
            capacity: 0,
            drop_policy: DropPolicy::default(),
            _item: PhantomData,
            _not_sync: PhantomData,
        }
    }
}

impl<T, A: Allocator> AllocVecBuilder<T, A> {
    /// Sets the allocator the container obtains memory from and hands its items to.
    #[inline]
    pub fn allocator<B: Allocator>(self, allocator: B) -> AllocVecBuilder<T, B> {
        AllocVecBuilder {
            allocator,
            capacity: self.capacity,
            drop_policy: self.drop_policy,
            _item: PhantomData,
            _not_sync: PhantomData,
        }
    }

    /// Sets the exact initial capacity of the container. Defaults to zero, in which case no
    /// memory is allocated until the first item is added.
    #[inline]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the [drop policy][DropPolicy] for the container. This governs how to treat remaining
    /// items when the container is dropped.
    #[inline]
    pub fn drop_policy(mut self, policy: DropPolicy) -> Self {
        self.drop_policy = policy;
        self
    }

    /// Builds the container with the specified configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial capacity exceeds the maximum size or cannot be allocated.
    pub fn build(self) -> Result<AllocVec<T, A>> {
        let buffer = RawBuffer::with_capacity_in(self.capacity, self.allocator)?;

        Ok(AllocVec::from_buffer(buffer, self.drop_policy))
    }
}

impl<T, A: Allocator + fmt::Debug> fmt::Debug for AllocVecBuilder<T, A> {
    #[cfg_attr(test, mutants::skip)] // We have no API contract here.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("allocator", &self.allocator)
            .field("capacity", &self.capacity)
            .field("drop_policy", &self.drop_policy)
            .finish()
    }
}
