use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

static LIVE_BYTES: AtomicUsize = AtomicUsize::new(0);

/// Pass-through to the system allocator that keeps a count of live bytes.
///
/// Install it in the final binary to make [`AllocatorGauge`] meaningful:
///
/// ```no_run
/// use bounded_vertex_cover::memory::TrackingAllocator;
///
/// #[global_allocator]
/// static GLOBAL: TrackingAllocator = TrackingAllocator;
///
/// fn main() {}
/// ```
pub struct TrackingAllocator;

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            LIVE_BYTES.fetch_add(layout.size(), Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            LIVE_BYTES.fetch_add(layout.size(), Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        LIVE_BYTES.fetch_sub(layout.size(), Ordering::Relaxed);
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            if new_size >= layout.size() {
                LIVE_BYTES.fetch_add(new_size - layout.size(), Ordering::Relaxed);
            } else {
                LIVE_BYTES.fetch_sub(layout.size() - new_size, Ordering::Relaxed);
            }
        }
        new_ptr
    }
}

/// Bytes currently allocated through [`TrackingAllocator`]. Stays at zero
/// when the allocator is not installed.
pub fn live_bytes() -> usize {
    LIVE_BYTES.load(Ordering::Relaxed)
}

/// A memory reading sampled between search steps.
pub trait MemoryGauge: Send + Sync {
    fn current_bytes(&self) -> usize;

    /// Whether readings reflect real usage. An inactive gauge reads 0 and
    /// never trips a memory limit.
    fn is_active(&self) -> bool {
        true
    }
}

/// Resident set size of the whole process. Works without any setup on the
/// platforms `memory-stats` supports, reads 0 elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessGauge;

impl MemoryGauge for ProcessGauge {
    fn current_bytes(&self) -> usize {
        memory_stats::memory_stats().map_or(0, |stats| stats.physical_mem)
    }

    fn is_active(&self) -> bool {
        memory_stats::memory_stats().is_some()
    }
}

/// Reads [`live_bytes`], heap bytes only. Needs [`TrackingAllocator`]
/// installed as the global allocator.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocatorGauge;

impl MemoryGauge for AllocatorGauge {
    fn current_bytes(&self) -> usize {
        live_bytes()
    }

    fn is_active(&self) -> bool {
        live_bytes() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[global_allocator]
    static GLOBAL: TrackingAllocator = TrackingAllocator;

    #[test]
    fn test_gauge_sees_allocations() {
        let gauge = AllocatorGauge;
        let buffer: Vec<u8> = Vec::with_capacity(64 << 20);
        // Other test threads allocate concurrently, but not 64 MiB worth.
        std::hint::black_box(&buffer);
        assert!(gauge.current_bytes() >= 64 << 20);
        drop(buffer);
    }

    #[test]
    fn test_process_gauge_reads_resident_memory() {
        let gauge = ProcessGauge;
        if !gauge.is_active() {
            return;
        }
        assert!(gauge.current_bytes() > 0);
    }

    #[test]
    fn test_allocator_gauge_is_active_when_installed() {
        let buffer = vec![0u8; 1024];
        std::hint::black_box(&buffer);
        assert!(AllocatorGauge.is_active());
    }

    #[test]
    fn test_realloc_tracks_growth() {
        let mut buffer: Vec<u8> = Vec::with_capacity(1 << 20);
        buffer.reserve_exact(32 << 20);
        std::hint::black_box(&buffer);
        assert!(live_bytes() >= 32 << 20);
    }
}
