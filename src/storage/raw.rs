//! Raw allocation backends.
//!
//! [`RawAllocator`] is the seam between the typed layer and whatever
//! actually produces memory. [`Global`] delegates to the process
//! allocator; [`Counting`] wraps any backend with live/total counters so
//! tests can verify the allocate/deallocate balance.

use alloc::alloc::{alloc as sys_alloc, dealloc as sys_dealloc};
use core::alloc::Layout;
use core::ptr::NonNull;
use core::sync::atomic::{AtomicUsize, Ordering};

use super::StorageError;

/// Byte-level allocation backend.
///
/// Implementors hand out uninitialized blocks described by a `Layout`
/// and release them on request. Failure surfaces as [`StorageError`] to
/// the direct caller; implementations do not retry and do not log.
pub trait RawAllocator {
    /// Reserve an uninitialized block for `layout`.
    ///
    /// The typed layer never forwards zero-size layouts; implementors
    /// may assume a non-trivial request.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, StorageError>;

    /// Release a block previously returned by [`allocate`](Self::allocate).
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate` on this same
    /// allocator with this exact `layout`, and must not be released
    /// twice.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

// Allocators are commonly borrowed into several typed fronts.
impl<A: RawAllocator + ?Sized> RawAllocator for &A {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, StorageError> {
        (**self).allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: contract forwarded unchanged.
        unsafe { (**self).deallocate(ptr, layout) }
    }
}

/// The process-wide general-purpose allocator.
///
/// Stateless: every `Global` value names the same underlying allocator,
/// so there is nothing to construct or tear down. Thread safety is
/// whatever the process allocator provides; this layer adds no locking
/// of its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct Global;

impl RawAllocator for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, StorageError> {
        debug_assert!(layout.size() != 0);
        // SAFETY: the typed layer guarantees a non-zero-size layout.
        let ptr = unsafe { sys_alloc(layout) };
        NonNull::new(ptr).ok_or(StorageError::exhausted(layout))
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: contract forwarded from the trait: `ptr`/`layout`
        // came from a matching `allocate`.
        unsafe { sys_dealloc(ptr.as_ptr(), layout) }
    }
}

/// Instrumented backend counting outstanding and total allocations.
///
/// Wraps any [`RawAllocator`]; `live()` is the number of blocks
/// allocated and not yet released, `calls()` the number of requests that
/// reached the inner allocator. A balanced caller ends with
/// `live() == 0`.
///
/// ```
/// use tola_mem::{Counting, Global, TypedAlloc};
///
/// let raw = Counting::new(Global);
/// let alloc = TypedAlloc::<u64, _>::with_raw(&raw);
///
/// let block = alloc.allocate(8).unwrap();
/// assert_eq!(raw.live(), 1);
/// // SAFETY: `block` came from this allocator and holds no objects.
/// unsafe { alloc.deallocate(block) };
/// assert_eq!(raw.live(), 0);
/// ```
#[derive(Debug, Default)]
pub struct Counting<A = Global> {
    inner: A,
    live: AtomicUsize,
    calls: AtomicUsize,
}

impl<A> Counting<A> {
    /// Wrap `inner` with both counters at zero.
    pub const fn new(inner: A) -> Self {
        Counting { inner, live: AtomicUsize::new(0), calls: AtomicUsize::new(0) }
    }

    /// Blocks allocated and not yet released.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }

    /// Total requests that reached the inner allocator.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl<A: RawAllocator> RawAllocator for Counting<A> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, StorageError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let ptr = self.inner.allocate(layout)?;
        self.live.fetch_add(1, Ordering::Relaxed);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.live.fetch_sub(1, Ordering::Relaxed);
        // SAFETY: contract forwarded unchanged to the inner allocator.
        unsafe { self.inner.deallocate(ptr, layout) }
    }
}
