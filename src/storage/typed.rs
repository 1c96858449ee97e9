//! The typed allocation front.
//!
//! [`TypedAlloc`] speaks in elements of `T` rather than bytes, and keeps
//! the four operation families independent: reserving storage never
//! constructs, destroying never releases.

use core::alloc::Layout;
use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;

use super::construct;
use super::{Global, RawAllocator, StorageError};

/// Raw storage for up to `capacity()` elements of `T`.
///
/// A `Storage` owns a block of address-stable bytes and nothing else: it
/// holds no live objects, and dropping the handle does *not* release the
/// block; storage release is an explicit
/// [`deallocate`](TypedAlloc::deallocate) call, mirroring how object
/// destruction is explicit. The handle is move-only, which is the
/// single-owner convention for raw storage made structural.
pub struct Storage<T> {
    ptr: NonNull<T>,
    cap: usize,
}

impl<T> Storage<T> {
    /// The explicit empty handle: dangling pointer, zero capacity.
    ///
    /// Deallocating it is a no-op, so cleanup paths can release
    /// unconditionally without a guard.
    pub const fn empty() -> Self {
        Storage { ptr: NonNull::dangling(), cap: 0 }
    }

    pub(super) const fn from_raw(ptr: NonNull<T>, cap: usize) -> Self {
        Storage { ptr, cap }
    }

    /// Number of element slots in this block.
    pub const fn capacity(&self) -> usize {
        self.cap
    }

    /// `true` for handles that own no underlying block.
    pub const fn is_empty(&self) -> bool {
        self.cap == 0 || size_of::<T>() == 0
    }

    /// Pointer to the first slot.
    pub const fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }
}

impl<T> fmt::Debug for Storage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage").field("ptr", &self.ptr).field("cap", &self.cap).finish()
    }
}

/// Typed allocation and object lifetime, decoupled.
///
/// The operation families:
///
/// - **allocate**: [`allocate_one`](Self::allocate_one) /
///   [`allocate`](Self::allocate) reserve uninitialized storage
/// - **construct**: [`construct`](Self::construct) /
///   [`construct_clone`](Self::construct_clone) /
///   [`construct_with`](Self::construct_with) / [`emplace`](Self::emplace)
///   begin object lifetimes inside it
/// - **destroy**: [`destroy`](Self::destroy) /
///   [`destroy_range`](Self::destroy_range) end them, leaving storage
///   reusable
/// - **deallocate**: [`deallocate_one`](Self::deallocate_one) /
///   [`deallocate`](Self::deallocate) release the storage
///
/// The raw backend `A` is injected ([`Global`] by default); a shared
/// backend can be borrowed into several typed fronts since `&A` is
/// itself a [`RawAllocator`].
pub struct TypedAlloc<T, A: RawAllocator = Global> {
    raw: A,
    _elem: PhantomData<T>,
}

impl<T> TypedAlloc<T, Global> {
    /// Typed front over the process allocator.
    pub const fn new() -> Self {
        TypedAlloc { raw: Global, _elem: PhantomData }
    }
}

impl<T> Default for TypedAlloc<T, Global> {
    fn default() -> Self {
        TypedAlloc::new()
    }
}

impl<T, A: RawAllocator + Clone> Clone for TypedAlloc<T, A> {
    fn clone(&self) -> Self {
        TypedAlloc { raw: self.raw.clone(), _elem: PhantomData }
    }
}

impl<T, A: RawAllocator + Copy> Copy for TypedAlloc<T, A> {}

impl<T, A: RawAllocator + fmt::Debug> fmt::Debug for TypedAlloc<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedAlloc").field("raw", &self.raw).finish()
    }
}

impl<T, A: RawAllocator> TypedAlloc<T, A> {
    /// Typed front over an injected raw backend.
    pub const fn with_raw(raw: A) -> Self {
        TypedAlloc { raw, _elem: PhantomData }
    }

    /// The raw backend.
    pub const fn raw(&self) -> &A {
        &self.raw
    }

    /// Reserve uninitialized space for exactly one `T`.
    ///
    /// For zero-sized `T` the pointer is dangling and the raw backend is
    /// never contacted. Failure propagates from the backend untouched.
    pub fn allocate_one(&self) -> Result<NonNull<T>, StorageError> {
        if size_of::<T>() == 0 {
            return Ok(NonNull::dangling());
        }
        Ok(self.raw.allocate(Layout::new::<T>())?.cast())
    }

    /// Reserve uninitialized space for `n` instances of `T`.
    ///
    /// `n == 0` yields [`Storage::empty`] and zero-sized `T` a dangling
    /// block of capacity `n`; neither contacts the raw backend. A count
    /// whose byte size overflows `isize::MAX` is rejected as
    /// [`StorageError::CapacityOverflow`] before the backend is asked.
    pub fn allocate(&self, n: usize) -> Result<Storage<T>, StorageError> {
        if size_of::<T>() == 0 {
            return Ok(Storage::from_raw(NonNull::dangling(), n));
        }
        if n == 0 {
            return Ok(Storage::empty());
        }
        let layout = Layout::array::<T>(n).map_err(|_| StorageError::CapacityOverflow)?;
        Ok(Storage::from_raw(self.raw.allocate(layout)?.cast(), n))
    }

    /// Release the slot obtained from [`allocate_one`](Self::allocate_one).
    ///
    /// # Safety
    ///
    /// `ptr` must have come from `allocate_one` on this allocator, the
    /// slot must hold no live object, and it must not be released twice.
    pub unsafe fn deallocate_one(&self, ptr: NonNull<T>) {
        if size_of::<T>() == 0 {
            return;
        }
        // SAFETY: `ptr` came from `allocate_one`, which used this layout.
        unsafe { self.raw.deallocate(ptr.cast(), Layout::new::<T>()) }
    }

    /// Release a block obtained from [`allocate`](Self::allocate).
    ///
    /// Empty and dangling handles are accepted silently (no-op), so
    /// cleanup paths can deallocate unconditionally.
    ///
    /// # Safety
    ///
    /// `storage` must have come from `allocate` on this allocator and
    /// every object constructed in it must already be destroyed.
    pub unsafe fn deallocate(&self, storage: Storage<T>) {
        if storage.is_empty() {
            return;
        }
        // SAFETY: `allocate` validated this exact array layout when it
        // produced a non-empty handle.
        let layout = unsafe {
            Layout::from_size_align_unchecked(size_of::<T>() * storage.cap, align_of::<T>())
        };
        // SAFETY: non-empty handles were produced by `self.raw.allocate`
        // with this layout, and the caller owns the handle (move-only),
        // so it cannot be released twice.
        unsafe { self.raw.deallocate(storage.ptr.cast(), layout) }
    }

    /// Default-build a `T` at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writes, properly aligned, and the slot
    /// must hold no live object.
    pub unsafe fn construct(&self, ptr: *mut T)
    where
        T: Default,
    {
        // SAFETY: contract forwarded unchanged.
        unsafe { construct::construct_in(ptr) }
    }

    /// Copy-build a `T` at `ptr` from a borrowed source.
    ///
    /// # Safety
    ///
    /// Same slot contract as [`construct`](Self::construct); `value`
    /// must not overlap the slot.
    pub unsafe fn construct_clone(&self, ptr: *mut T, value: &T)
    where
        T: Clone,
    {
        // SAFETY: contract forwarded unchanged.
        unsafe { construct::construct_clone_in(ptr, value) }
    }

    /// Move-build a `T` at `ptr`; ownership transfers, no clone occurs.
    ///
    /// # Safety
    ///
    /// Same slot contract as [`construct`](Self::construct).
    pub unsafe fn construct_with(&self, ptr: *mut T, value: T) {
        // SAFETY: contract forwarded unchanged.
        unsafe { construct::construct_with_in(ptr, value) }
    }

    /// Build a `T` at `ptr` from the result of `make`; the closure's
    /// captures keep their ownership, so nothing is copied on the way
    /// in.
    ///
    /// # Safety
    ///
    /// Same slot contract as [`construct`](Self::construct).
    pub unsafe fn emplace<F>(&self, ptr: *mut T, make: F)
    where
        F: FnOnce() -> T,
    {
        // SAFETY: contract forwarded unchanged.
        unsafe { construct::emplace_in(ptr, make) }
    }

    /// Run `T`'s destructor at `ptr`; the storage stays reusable.
    ///
    /// # Safety
    ///
    /// `ptr` must point at exactly one live `T` that is not used again.
    pub unsafe fn destroy(&self, ptr: *mut T) {
        // SAFETY: contract forwarded unchanged.
        unsafe { construct::destroy_in(ptr) }
    }

    /// Destroy every object in `[first, last)`, forward order.
    ///
    /// # Safety
    ///
    /// The range must delimit contiguous live `T`s within one
    /// allocation, none of which are used again.
    pub unsafe fn destroy_range(&self, first: *mut T, last: *mut T) {
        // SAFETY: contract forwarded unchanged.
        unsafe { construct::destroy_range_in(first, last) }
    }
}
