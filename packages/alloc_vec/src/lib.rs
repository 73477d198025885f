#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A contiguous growable sequence that routes every allocation, construction and destruction
//! through a pluggable allocator.
//!
//! This crate provides [`AllocVec`], a vector-like container parameterized by an [`Allocator`].
//! The allocator not only hands out raw memory but also places each item into its slot and
//! destroys each item that ends its life inside the container, which makes it possible to observe
//! or customize the full lifecycle of every item.
//!
//! # Key Features
//!
//! - **Allocator-mediated lifecycle**: memory, item construction and item destruction all go
//!   through the [`Allocator`] trait
//! - **Allocator propagation**: a per-allocator [`Propagation`] policy decides whether allocators
//!   travel with the contents on copy assignment, move assignment and swap
//! - **Fallible growth**: operations that need memory return a [`Result`][std::result::Result]
//!   and leave the container unchanged when memory cannot be obtained
//! - **Amortized growth**: capacity doubles when full, with exact control via
//!   [`reserve()`][AllocVec::reserve] and [`shrink_to_fit()`][AllocVec::shrink_to_fit]
//! - **Position-based editing**: insert, emplace and erase at any [`Position`] with a single shift
//!   per operation
//! - **Slice access**: the container dereferences to `[T]`, so all slice methods are available
//! - **Flexible drop policies**: optionally require the container to be emptied before it is
//!   dropped
//!
//! # Examples
//!
//! ## Basic usage
//!
//! ```rust
//! use alloc_vec::AllocVec;
//!
//! let mut items = AllocVec::new();
//!
//! items.push(1).unwrap();
//! items.push(2).unwrap();
//! items.push(3).unwrap();
//!
//! assert_eq!(items.len(), 3);
//! assert_eq!(items[1], 2);
//! assert_eq!(items.iter().sum::<i32>(), 6);
//! ```
//!
//! ## Editing at positions
//!
//! ```rust
//! use alloc_vec::AllocVec;
//!
//! let mut items = AllocVec::from([1, 2]);
//!
//! items.insert_n(items.begin(), 3, &0).unwrap();
//! assert_eq!(items, [0, 0, 0, 1, 2]);
//!
//! let next = items.erase(items.begin() + 1);
//! assert_eq!(next.index(), 1);
//! assert_eq!(items, [0, 0, 1, 2]);
//!
//! let removed = alloc_vec::erase(&mut items, &0);
//! assert_eq!(removed, 2);
//! assert_eq!(items, [1, 2]);
//! ```
//!
//! ## Custom allocator
//!
//! ```rust
//! use std::alloc::Layout;
//! use std::cell::Cell;
//! use std::ptr::NonNull;
//! use std::rc::Rc;
//!
//! use alloc_vec::{AllocError, AllocVec, Allocator, Global};
//!
//! /// Counts how many items were placed into containers using this allocator.
//! #[derive(Clone, Default, PartialEq)]
//! struct Counting {
//!     constructed: Rc<Cell<usize>>,
//! }
//!
//! // SAFETY: Memory comes from the global allocator.
//! unsafe impl Allocator for Counting {
//!     fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
//!         Global.allocate(layout)
//!     }
//!
//!     unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
//!         // SAFETY: Forwarding the caller's guarantees.
//!         unsafe { Global.deallocate(ptr, layout) }
//!     }
//!
//!     unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
//!         self.constructed.set(self.constructed.get() + 1);
//!
//!         // SAFETY: Forwarding the caller's guarantees.
//!         unsafe { slot.write(value) }
//!     }
//! }
//!
//! let allocator = Counting::default();
//! let mut items: AllocVec<&str, _> = AllocVec::new_in(allocator.clone());
//!
//! items.extend(["a", "b", "c"]);
//!
//! assert_eq!(allocator.constructed.get(), 3);
//! ```

mod alloc_vec;
mod allocator;
mod builder;
mod drop_policy;
mod error;
mod functions;
mod iter;
mod mutate;
mod position;
mod raw_buffer;
mod transfer;

#[cfg(test)]
mod testing;

pub use alloc_vec::AllocVec;
pub use allocator::{AllocError, Allocator, Global, Propagation};
pub use builder::*;
pub use drop_policy::*;
pub use error::Error;
pub(crate) use error::Result;
pub use functions::*;
pub use iter::IntoIter;
pub use position::Position;
pub(crate) use raw_buffer::*;
