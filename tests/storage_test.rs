//! Tests for the typed allocation facility.
//!
//! The instrumented `Counting` backend makes the allocate/deallocate
//! balance observable; probe types with counting constructors and
//! destructors make object lifetimes observable.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tola_mem::{Counting, Global, Pair, Storage, StorageError, TypedAlloc};

// =============================================================================
// Allocation / Deallocation
// =============================================================================

#[test]
fn balanced_alloc_leaves_nothing_live() {
    let raw = Counting::new(Global);
    let alloc = TypedAlloc::<u64, _>::with_raw(&raw);

    for n in [1usize, 2, 17, 1024] {
        let block = alloc.allocate(n).unwrap();
        assert_eq!(block.capacity(), n);
        // SAFETY: `block` came from this allocator and holds no objects.
        unsafe { alloc.deallocate(block) };
    }
    assert_eq!(raw.live(), 0);
    assert_eq!(raw.calls(), 4);
}

#[test]
fn zero_count_never_reaches_the_backend() {
    let raw = Counting::new(Global);
    let alloc = TypedAlloc::<u64, _>::with_raw(&raw);

    let block = alloc.allocate(0).unwrap();
    assert!(block.is_empty());
    assert_eq!(block.capacity(), 0);
    assert_eq!(raw.calls(), 0);

    // SAFETY: empty handles are a documented no-op.
    unsafe { alloc.deallocate(block) };
    assert_eq!(raw.live(), 0);
    assert_eq!(raw.calls(), 0);
}

#[test]
fn empty_handle_deallocates_as_noop() {
    let raw = Counting::new(Global);
    let alloc = TypedAlloc::<String, _>::with_raw(&raw);

    // SAFETY: empty handles are a documented no-op.
    unsafe { alloc.deallocate(Storage::empty()) };
    assert_eq!(raw.live(), 0);
    assert_eq!(raw.calls(), 0);
}

#[test]
fn zero_sized_elements_never_allocate() {
    let raw = Counting::new(Global);
    let alloc = TypedAlloc::<(), _>::with_raw(&raw);

    let one = alloc.allocate_one().unwrap();
    let block = alloc.allocate(64).unwrap();
    assert_eq!(block.capacity(), 64);

    // SAFETY: both handles came from this allocator, no live objects.
    unsafe {
        alloc.deallocate(block);
        alloc.deallocate_one(one);
    }
    assert_eq!(raw.calls(), 0);
}

#[test]
fn overflowing_capacity_is_rejected_up_front() {
    let raw = Counting::new(Global);
    let alloc = TypedAlloc::<u64, _>::with_raw(&raw);

    let err = alloc.allocate(usize::MAX / 2).unwrap_err();
    assert_eq!(err, StorageError::CapacityOverflow);
    assert_eq!(raw.calls(), 0);
}

// =============================================================================
// Construct / Destroy
// =============================================================================

#[test]
fn default_construct_then_destroy_is_one_ctor_one_dtor() {
    static CTORS: AtomicUsize = AtomicUsize::new(0);
    static DTORS: AtomicUsize = AtomicUsize::new(0);

    struct Probe;
    impl Default for Probe {
        fn default() -> Self {
            CTORS.fetch_add(1, Ordering::SeqCst);
            Probe
        }
    }
    impl Drop for Probe {
        fn drop(&mut self) {
            assert_eq!(CTORS.load(Ordering::SeqCst), 1, "destructor ran before constructor");
            DTORS.fetch_add(1, Ordering::SeqCst);
        }
    }

    let alloc = TypedAlloc::<Probe>::new();
    let slot = alloc.allocate_one().unwrap();
    // SAFETY: fresh slot; exactly one construct before the destroy.
    unsafe {
        alloc.construct(slot.as_ptr());
        alloc.destroy(slot.as_ptr());
        alloc.deallocate_one(slot);
    }
    assert_eq!(CTORS.load(Ordering::SeqCst), 1);
    assert_eq!(DTORS.load(Ordering::SeqCst), 1);
}

#[test]
fn move_construction_never_clones() {
    static CLONES: AtomicUsize = AtomicUsize::new(0);

    #[derive(Default)]
    struct Probe(u32);
    impl Clone for Probe {
        fn clone(&self) -> Self {
            CLONES.fetch_add(1, Ordering::SeqCst);
            Probe(self.0)
        }
    }

    let alloc = TypedAlloc::<Probe>::new();
    let slot = alloc.allocate_one().unwrap();
    // SAFETY: single slot, construct/destroy strictly alternated.
    unsafe {
        alloc.construct_with(slot.as_ptr(), Probe(7));
        assert_eq!((*slot.as_ptr()).0, 7);
        alloc.destroy(slot.as_ptr());

        let owned = Probe(9);
        alloc.emplace(slot.as_ptr(), move || owned);
        assert_eq!((*slot.as_ptr()).0, 9);
        alloc.destroy(slot.as_ptr());
    }
    assert_eq!(CLONES.load(Ordering::SeqCst), 0);

    // The copy-building path is the one that clones.
    let original = Probe(3);
    // SAFETY: same slot contract as above.
    unsafe {
        alloc.construct_clone(slot.as_ptr(), &original);
        assert_eq!((*slot.as_ptr()).0, 3);
        alloc.destroy(slot.as_ptr());
        alloc.deallocate_one(slot);
    }
    assert_eq!(CLONES.load(Ordering::SeqCst), 1);
}

#[test]
fn storage_is_reusable_after_destroy() {
    let alloc = TypedAlloc::<String>::new();
    let slot = alloc.allocate_one().unwrap();
    // SAFETY: construct/destroy strictly alternated on one slot.
    unsafe {
        alloc.construct_with(slot.as_ptr(), String::from("a"));
        alloc.destroy(slot.as_ptr());
        alloc.construct_with(slot.as_ptr(), String::from("b"));
        assert_eq!(*slot.as_ptr(), "b");
        alloc.destroy(slot.as_ptr());
        alloc.deallocate_one(slot);
    }
}

#[test]
fn destroy_range_runs_forward() {
    struct Ordered(usize, Rc<RefCell<Vec<usize>>>);
    impl Drop for Ordered {
        fn drop(&mut self) {
            self.1.borrow_mut().push(self.0);
        }
    }

    let order = Rc::new(RefCell::new(Vec::new()));
    let alloc = TypedAlloc::<Ordered>::new();
    let block = alloc.allocate(4).unwrap();
    // SAFETY: all four slots are constructed before the bulk destroy,
    // and the block is released only after every object is gone.
    unsafe {
        for i in 0..4 {
            alloc.construct_with(block.as_ptr().add(i), Ordered(i, order.clone()));
        }
        alloc.destroy_range(block.as_ptr(), block.as_ptr().add(4));
        alloc.deallocate(block);
    }
    assert_eq!(*order.borrow(), vec![0, 1, 2, 3]);
}

// =============================================================================
// Consumer pattern
// =============================================================================

#[test]
fn pairs_flow_through_the_allocator() {
    let raw = Counting::new(Global);
    let alloc = TypedAlloc::<Pair<u32, String>, _>::with_raw(&raw);

    let block = alloc.allocate(2).unwrap();
    // SAFETY: allocate -> construct -> use -> destroy -> deallocate,
    // each slot constructed exactly once.
    unsafe {
        alloc.emplace(block.as_ptr(), || Pair::new(1, String::from("one")));
        alloc.emplace(block.as_ptr().add(1), || Pair::new(2, String::from("two")));
        assert_eq!((*block.as_ptr()).second, "one");
        assert_eq!((*block.as_ptr().add(1)).first, 2);
        alloc.destroy_range(block.as_ptr(), block.as_ptr().add(2));
        alloc.deallocate(block);
    }
    assert_eq!(raw.live(), 0);
}
