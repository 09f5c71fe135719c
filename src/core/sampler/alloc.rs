use std::alloc::{GlobalAlloc, Layout};
use std::sync::atomic::{AtomicU64, Ordering};

static ALLOCATED: AtomicU64 = AtomicU64::new(0);
static TOTAL_ALLOCATED: AtomicU64 = AtomicU64::new(0);
static MALLOCS: AtomicU64 = AtomicU64::new(0);
static FREES: AtomicU64 = AtomicU64::new(0);

/// Global allocator wrapper keeping process wide allocation counters.
/// Install it with `#[global_allocator]` around the real allocator.
/// A realloc counts as one free plus one allocation
pub struct CountingAlloc<A> {
    inner: A,
}

impl<A> CountingAlloc<A> {
    pub const fn new(inner: A) -> Self {
        CountingAlloc { inner }
    }
}

fn record_alloc(size: usize) {
    ALLOCATED.fetch_add(size as u64, Ordering::Relaxed);
    TOTAL_ALLOCATED.fetch_add(size as u64, Ordering::Relaxed);
    MALLOCS.fetch_add(1, Ordering::Relaxed);
}

fn record_free(size: usize) {
    ALLOCATED.fetch_sub(size as u64, Ordering::Relaxed);
    FREES.fetch_add(1, Ordering::Relaxed);
}

unsafe impl<A: GlobalAlloc> GlobalAlloc for CountingAlloc<A> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { self.inner.alloc(layout) };
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { self.inner.alloc_zeroed(layout) };
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { self.inner.dealloc(ptr, layout) };
        record_free(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { self.inner.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            record_free(layout.size());
            record_alloc(new_size);
        }
        new_ptr
    }
}

/// Counters as seen at one instant, each read independently
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocStats {
    /// Bytes currently allocated
    pub allocated: u64,
    /// Bytes allocated since start, frees not subtracted
    pub total_allocated: u64,
    pub mallocs: u64,
    pub frees: u64,
}

impl AllocStats {
    /// Live allocations
    pub fn heap_objects(&self) -> u64 {
        self.mallocs.saturating_sub(self.frees)
    }
}

/// All zero unless a [`CountingAlloc`] is the global allocator
pub fn alloc_stats() -> AllocStats {
    AllocStats {
        allocated: ALLOCATED.load(Ordering::Relaxed),
        total_allocated: TOTAL_ALLOCATED.load(Ordering::Relaxed),
        mallocs: MALLOCS.load(Ordering::Relaxed),
        frees: FREES.load(Ordering::Relaxed),
    }
}

#[cfg(test)]
#[global_allocator]
static TEST_ALLOC: CountingAlloc<std::alloc::System> = CountingAlloc::new(std::alloc::System);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_allocations() {
        let before = alloc_stats();

        let buf: Vec<u8> = Vec::with_capacity(1 << 20);
        let during = alloc_stats();
        drop(buf);
        let after = alloc_stats();

        assert!(during.mallocs > before.mallocs);
        assert!(during.total_allocated >= before.total_allocated + (1 << 20));
        assert!(after.frees > before.frees);
    }

    #[test]
    fn test_heap_objects() {
        let stats = AllocStats {
            mallocs: 10,
            frees: 4,
            ..Default::default()
        };
        assert_eq!(stats.heap_objects(), 6);
    }
}
