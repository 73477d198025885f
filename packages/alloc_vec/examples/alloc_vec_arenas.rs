//! Example that shows how allocator propagation decides what happens when contents move between
//! containers backed by different arenas.

use std::alloc::Layout;
use std::cell::Cell;
use std::ptr::NonNull;
use std::rc::Rc;

use alloc_vec::{AllocError, AllocVec, Allocator, Global, Propagation};

/// An arena that keeps count of the blocks it currently has outstanding.
#[derive(Clone, Debug)]
struct Arena {
    name: &'static str,
    outstanding: Rc<Cell<usize>>,
}

impl Arena {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            outstanding: Rc::default(),
        }
    }
}

impl PartialEq for Arena {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

// SAFETY: Memory comes from the global allocator.
unsafe impl Allocator for Arena {
    const PROPAGATION: Propagation = Propagation::Never;

    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        self.outstanding.set(self.outstanding.get() + 1);
        Global.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.outstanding.set(self.outstanding.get() - 1);

        // SAFETY: Forwarding the caller's guarantees.
        unsafe { Global.deallocate(ptr, layout) }
    }
}

fn main() {
    println!("=== AllocVec Arenas Example ===");

    let left = Arena::new("left");
    let right = Arena::new("right");

    let mut source = AllocVec::from_slice_in(&["a", "b", "c"], left.clone()).unwrap();
    let mut target = AllocVec::new_in(right.clone());

    // The arenas differ and the allocator never propagates, so the items are moved one by one
    // into storage owned by the target's arena and the source's storage is returned to its own.
    target.move_from(&mut source).unwrap();

    println!("Target: {target:?} in arena {}", target.allocator().name);
    println!(
        "Outstanding blocks: left = {}, right = {}",
        left.outstanding.get(),
        right.outstanding.get()
    );

    assert!(source.is_empty());
    assert_eq!(left.outstanding.get(), 0);
    assert_eq!(right.outstanding.get(), 1);

    // Moving within the same arena just hands over the storage.
    let mut same_arena = AllocVec::new_in(right.clone());
    same_arena.move_from(&mut target).unwrap();

    println!("Moved within arena, outstanding right = {}", right.outstanding.get());
    assert_eq!(right.outstanding.get(), 1);

    println!("Arenas example completed successfully!");
}
