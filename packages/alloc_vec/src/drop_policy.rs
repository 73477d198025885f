/// Decides whether an [`AllocVec`][crate::AllocVec] may still hold items when it is dropped.
///
/// The policy is chosen through the [builder][crate::AllocVecBuilder] and travels with the
/// contents: [`take()`][crate::AllocVec::take], [`take_in()`][crate::AllocVec::take_in] and copies
/// made via [`try_clone()`][crate::AllocVec::try_clone] all carry it over to the new container.
/// Storage is released through the allocator regardless of the policy.
///
/// # Examples
///
/// ```
/// use alloc_vec::{AllocVec, DropPolicy};
///
/// let mut items = AllocVec::<u32>::builder()
///     .drop_policy(DropPolicy::MustNotDropItems)
///     .build()
///     .unwrap();
///
/// items.push(1).unwrap();
///
/// // Every item must be handed back before the container goes away.
/// assert_eq!(items.pop(), Some(1));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum DropPolicy {
    /// Remaining items are destroyed through the allocator when the container is dropped.
    #[default]
    MayDropItems,

    /// Dropping a container that still holds items panics, after its items are destroyed and its
    /// storage is released. No second panic is raised if the thread is already unwinding.
    ///
    /// A container emptied by [`take()`][crate::AllocVec::take] or
    /// [`move_from()`][crate::AllocVec::move_from] satisfies the policy, as does consuming it via
    /// [`into_iter()`][IntoIterator::into_iter]. Items left unconsumed in the resulting
    /// [`IntoIter`][crate::IntoIter] are destroyed without a panic.
    MustNotDropItems,
}
