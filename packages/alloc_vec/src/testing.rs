//! Allocators and item types that record what the container does with them.

use std::alloc::Layout;
use std::cell::Cell;
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::rc::Rc;

use crate::{AllocError, Allocator, Global, Propagation};

/// Selects the propagation policy of a [`TrackingAllocator`] at the type level.
pub(crate) trait Policy {
    const PROPAGATION: Propagation;
}

#[derive(Debug)]
pub(crate) struct Never;

impl Policy for Never {
    const PROPAGATION: Propagation = Propagation::Never;
}

#[derive(Debug)]
pub(crate) struct Always;

impl Policy for Always {
    const PROPAGATION: Propagation = Propagation::Always;
}

#[derive(Debug)]
pub(crate) struct IfUnequal;

impl Policy for IfUnequal {
    const PROPAGATION: Propagation = Propagation::IfUnequal;
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Stats {
    pub(crate) allocations: usize,
    pub(crate) deallocations: usize,
    pub(crate) constructs: usize,
    pub(crate) destroys: usize,
    pub(crate) last_allocation_size: usize,
}

#[derive(Debug, Default)]
struct State {
    stats: Cell<Stats>,
    fail_next_allocation: Cell<bool>,
}

impl State {
    fn update(&self, f: impl FnOnce(&mut Stats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

/// Allocator over the global heap that counts every call made to it.
///
/// Clones share their counters and compare equal. Instances created separately compare equal
/// only if they were given the same identity.
#[derive(Debug)]
pub(crate) struct TrackingAllocator<P: Policy = Never> {
    id: u32,
    state: Rc<State>,
    _policy: PhantomData<P>,
}

impl<P: Policy> TrackingAllocator<P> {
    pub(crate) fn new() -> Self {
        Self::with_id(0)
    }

    pub(crate) fn with_id(id: u32) -> Self {
        Self {
            id,
            state: Rc::new(State::default()),
            _policy: PhantomData,
        }
    }

    pub(crate) fn id(&self) -> u32 {
        self.id
    }

    pub(crate) fn stats(&self) -> Stats {
        self.state.stats.get()
    }

    pub(crate) fn fail_next_allocation(&self) {
        self.state.fail_next_allocation.set(true);
    }
}

impl<P: Policy> Clone for TrackingAllocator<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            state: Rc::clone(&self.state),
            _policy: PhantomData,
        }
    }
}

impl<P: Policy> PartialEq for TrackingAllocator<P> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

// SAFETY: We forward to the global allocator, which upholds the block validity requirements.
unsafe impl<P: Policy> Allocator for TrackingAllocator<P> {
    const PROPAGATION: Propagation = P::PROPAGATION;

    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if self.state.fail_next_allocation.replace(false) {
            return Err(AllocError);
        }

        self.state.update(|stats| {
            stats.allocations += 1;
            stats.last_allocation_size = layout.size();
        });

        Global.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.state.update(|stats| stats.deallocations += 1);

        // SAFETY: Every block we hand out comes from `Global` with the same layout.
        unsafe {
            Global.deallocate(ptr, layout);
        }
    }

    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        self.state.update(|stats| stats.constructs += 1);

        // SAFETY: Forwarding the caller's guarantees.
        unsafe {
            slot.write(value);
        }
    }

    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        self.state.update(|stats| stats.destroys += 1);

        // SAFETY: Forwarding the caller's guarantees.
        unsafe {
            slot.drop_in_place();
        }
    }
}

/// Shared counters for [`Tracked`] items.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    clones: Cell<usize>,
    clone_froms: Cell<usize>,
    drops: Cell<usize>,
    clones_until_panic: Cell<Option<usize>>,
}

impl Tally {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub(crate) fn clones(&self) -> usize {
        self.clones.get()
    }

    pub(crate) fn clone_froms(&self) -> usize {
        self.clone_froms.get()
    }

    pub(crate) fn drops(&self) -> usize {
        self.drops.get()
    }

    /// The next `count` clones succeed, the one after that panics.
    pub(crate) fn panic_after_clones(&self, count: usize) {
        self.clones_until_panic.set(Some(count));
    }

    fn on_clone(&self) {
        match self.clones_until_panic.get() {
            Some(0) => {
                self.clones_until_panic.set(None);
                panic!("clone failed on purpose");
            }
            Some(remaining) => self.clones_until_panic.set(Some(remaining - 1)),
            None => {}
        }

        self.clones.set(self.clones.get() + 1);
    }
}

/// An item that reports its clones, clone-assignments and drops to a shared [`Tally`].
#[derive(Debug)]
pub(crate) struct Tracked {
    pub(crate) value: u32,
    tally: Rc<Tally>,
}

impl Tracked {
    pub(crate) fn new(value: u32, tally: &Rc<Tally>) -> Self {
        Self {
            value,
            tally: Rc::clone(tally),
        }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        self.tally.on_clone();

        Self {
            value: self.value,
            tally: Rc::clone(&self.tally),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.tally.clone_froms.set(self.tally.clone_froms.get() + 1);
        self.value = source.value;
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.tally.drops.set(self.tally.drops.get() + 1);
    }
}
