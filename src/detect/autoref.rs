//! Shape and trait detection machinery.
//!
//! This module implements the "Inherent Const Fallback" pattern for
//! compile-time detection on concrete types.
//!
//! ## How it works
//!
//! For each predicate P we want to answer:
//! 1. Define a fallback trait with `const IS_P: bool = false`
//! 2. Implement the fallback for `Detect<T>` for all T
//! 3. Implement an inherent const `IS_P = true` for `Detect<T>` where
//!    the gating bound holds
//!
//! When resolving `Detect::<Concrete>::IS_P`, the compiler:
//! - If the bound holds, finds the inherent const (true)
//! - Otherwise, finds the trait const (false)
//!
//! ## Limitation
//!
//! This only works for **concrete types** known at the call site. It
//! does NOT work in generic contexts like `fn foo<T>()`; bound on
//! [`PairShaped`](crate::pair::PairShaped) (or the std trait itself)
//! there instead.

use core::marker::PhantomData;

use crate::pair::PairShaped;

/// Detection probe type.
pub struct Detect<T>(PhantomData<T>);

// =============================================================================
// Pair Shape Detection
// =============================================================================
//
// Gated on the sealed `PairShaped` marker rather than on `Pair<A, B>`
// directly, so further shape predicates slot in as new marker + const
// pairs without changing `shape_check!` call sites.

#[doc(hidden)]
pub trait PairFallback {
    const IS_PAIR: bool = false;
}
impl<T> PairFallback for Detect<T> {}

impl<T: PairShaped> Detect<T> {
    /// `true` exactly for `Pair<_, _>` instantiations.
    pub const IS_PAIR: bool = true;
}

// =============================================================================
// Capability Detection (generated)
// =============================================================================

/// Generate fallback trait + inherent const for a std trait.
macro_rules! impl_detect {
    ($Trait:ident) => {
        ::paste::paste! {
            #[doc(hidden)]
            pub trait [<$Trait Fallback>] { const [<IS_ $Trait:upper>]: bool = false; }
            impl<T> [<$Trait Fallback>] for Detect<T> {}
            impl<T: $Trait> Detect<T> { pub const [<IS_ $Trait:upper>]: bool = true; }
        }
    };
}

impl_detect!(Clone);
impl_detect!(Copy);
impl_detect!(Default);
impl_detect!(Eq);
impl_detect!(PartialEq);
impl_detect!(Ord);
impl_detect!(PartialOrd);
