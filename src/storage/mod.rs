//! # Layer 1: Storage
//!
//! The typed allocation facility. Get memory, build an object, tear it
//! down, release memory: four independently callable operation
//! families, so containers can grow or shrink storage without
//! constructing and destructing in lockstep.
//!
//! ## Design
//!
//! Allocation strategy is injected, not ambient: [`TypedAlloc`] carries
//! a [`RawAllocator`] value ([`Global`] by default), so a test can swap
//! in the instrumented [`Counting`] wrapper and *observe* that nothing
//! leaks instead of trusting that it doesn't.
//!
//! Raw storage ([`Storage`]) holds no live objects. Object lifetimes
//! begin and end only through the construct/destroy primitives; the
//! contracts are `unsafe fn` preconditions, so a violation cannot be
//! written without an `unsafe` block naming it.
//!
//! ## Failure semantics
//!
//! Allocation failure is the only reportable error ([`StorageError`]);
//! it surfaces to the direct caller, is never retried, and nothing is
//! logged or suppressed.

pub mod construct;
mod error;
mod raw;
mod typed;

pub use error::StorageError;
pub use raw::{Counting, Global, RawAllocator};
pub use typed::{Storage, TypedAlloc};
