#![cfg_attr(not(feature = "std"), no_std)]

// Feature flags handled:
// - std: default, enables std library
// - alloc: enables the storage layer in no_std
// - detect: shape/trait detection

//! # tola-mem
//!
//! Typed allocation, explicit object lifetime, and capability-gated
//! value pairing.
//!
//! **Memory-management foundation for generic containers.**
//!
//! ## Architecture
//!
//! `tola-mem` separates *getting memory* from *beginning an object's
//! lifetime* (and tearing down from releasing), and pairs that with a
//! compile-time shape-query facility used to gate which operations are
//! well-formed for a given element type.
//!
//! ### 1. Storage
//! Raw storage is a block sized for `n` elements holding no live
//! objects. The allocator hands it out, construction primitives bring
//! objects to life inside it, destruction ends them, deallocation
//! releases the block:
//!
//! ```text
//! allocate -> construct -> (use) -> destroy -> deallocate
//! ```
//!
//! ### 2. Shape Detection
//! "Is `T` a `Pair<_, _>`?" is answered at compile time via the
//! inherent-const-fallback trick: an inherent `true` const shadows a
//! trait-supplied `false` const exactly when the shape bound holds.
//!
//! ### 3. Pairing
//! [`Pair`] is a two-slot value whose constructors are a fixed set of
//! capability-gated rules (`Default`/`Clone`/`Into`/`From<&_>` bounds),
//! each a distinct named entry point so selection can never be
//! ambiguous.
//!
//! ```text
//! +-------------------------------------------------------------------+
//! |  Layer 0: Primitives                                              |
//! |  - Bool (Present/Absent), And/Or/Not, SelectBool, If              |
//! +-------------------------------------------------------------------+
//!                                |
//!                                v
//! +-------------------------------------------------------------------+
//! |  Layer 1: Storage                                                 |
//! |  - RawAllocator (Global, Counting), TypedAlloc, Storage<T>        |
//! |  - construct / destroy primitives                                 |
//! +-------------------------------------------------------------------+
//!                                |
//!                                v
//! +-------------------------------------------------------------------+
//! |  Layer 2: Detection + User API                                    |
//! |  - Detect<T>, shape_check!, ShapeBool                             |
//! |  - Pair<A, B>, make_pair, swap                                    |
//! +-------------------------------------------------------------------+
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use tola_mem::{Pair, make_pair, shape_check};
//!
//! // Capability-gated construction: i32 converts into i64.
//! let p = Pair::<i64, i64>::of(1i32, 2i32);
//! assert_eq!(p, make_pair(1i64, 2i64));
//!
//! // Shape query, resolved at compile time.
//! assert!(shape_check!(Pair<i64, i64>: Pair));
//! assert!(!shape_check!((i64, i64): Pair));
//! ```
//!
//! ## Features
//!
//! - **Zero runtime dispatch**: every construction rule and shape query
//!   resolves during type checking
//! - **Injected allocation strategy**: [`TypedAlloc`] carries its raw
//!   allocator, so tests can count allocations instead of trusting them
//! - **`no_std` support**: the storage layer needs only `alloc`

#[cfg(feature = "alloc")]
extern crate alloc;

// Re-export paste for the shape_check! macro
pub use paste;

// =============================================================================
// Layer 0: Primitives (no dependencies)
// =============================================================================
pub mod primitives;

// =============================================================================
// Layer 1: Storage
// =============================================================================
#[cfg(feature = "alloc")]
pub mod storage;

// =============================================================================
// Layer 2: Shape Detection
// =============================================================================
#[cfg(feature = "detect")]
pub mod detect;

// =============================================================================
// Layer 2: Pair Value
// =============================================================================
pub mod pair;

// =============================================================================
// Re-exports at Crate Root
// =============================================================================

pub use primitives::bool::{Absent, Bool, BoolNot, Elif, If, Present, SelectBool};

#[cfg(feature = "alloc")]
pub use storage::{Counting, Global, RawAllocator, Storage, StorageError, TypedAlloc};

#[cfg(feature = "detect")]
pub use detect::{Detect, ShapeBool};

pub use pair::{Pair, PairShaped, make_pair, swap};

/// Common items for typed allocation and pairing.
pub mod prelude {
    pub use crate::pair::{Pair, PairShaped, make_pair};
    #[cfg(feature = "alloc")]
    pub use crate::storage::{Global, RawAllocator, Storage, StorageError, TypedAlloc};
    #[cfg(feature = "detect")]
    pub use crate::detect::Detect;
    // Note: shape_check! is #[macro_export] so it's at the crate root
}
