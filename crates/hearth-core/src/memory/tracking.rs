// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A `GlobalAlloc` wrapper that feeds the host-wide memory counters.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::Ordering;

use super::{record_alloc, record_dealloc, update_peak, CURRENTLY_ALLOCATED_BYTES};

/// A wrapper around a `GlobalAlloc` implementation (defaults to `System`)
/// that reports every allocation into the counters in [`crate::memory`].
///
/// Install it as the process allocator to account for all heap traffic:
///
/// ```ignore
/// #[global_allocator]
/// static GLOBAL: TrackingAllocator = TrackingAllocator::new(System);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct TrackingAllocator<A = System> {
    inner: A,
}

impl<A> TrackingAllocator<A> {
    /// Creates a new tracking allocator wrapping the given inner allocator.
    pub const fn new(inner: A) -> Self {
        Self { inner }
    }
}

unsafe impl<A: GlobalAlloc> GlobalAlloc for TrackingAllocator<A> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { self.inner.alloc(layout) };
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        record_dealloc(layout.size());
        unsafe { self.inner.dealloc(ptr, layout) };
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { self.inner.alloc_zeroed(layout) };
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let old_size = layout.size();
        let new_ptr = unsafe { self.inner.realloc(ptr, layout, new_size) };

        if !new_ptr.is_null() {
            // A grow or shrink in place adjusts the byte counter by the
            // difference without counting as a fresh allocation.
            let result = match new_size.cmp(&old_size) {
                std::cmp::Ordering::Greater => CURRENTLY_ALLOCATED_BYTES.fetch_update(
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                    |current| current.checked_add(new_size - old_size),
                ),
                std::cmp::Ordering::Less => CURRENTLY_ALLOCATED_BYTES.fetch_update(
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                    |current| current.checked_sub(old_size - new_size),
                ),
                std::cmp::Ordering::Equal => Ok(CURRENTLY_ALLOCATED_BYTES.load(Ordering::Relaxed)),
            };

            match result {
                Ok(previous) if new_size > old_size => {
                    update_peak(previous + (new_size - old_size));
                }
                Ok(_) => {}
                Err(_) => log::error!(
                    "Memory tracking counter overflowed during realloc! Old: {old_size}, new: {new_size}"
                ),
            }
        }
        new_ptr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::memory_stats;

    fn test_layout(size: usize) -> Layout {
        Layout::from_size_align(size, 8).expect("static test layout")
    }

    #[test]
    fn tracks_alloc_and_dealloc() {
        let allocator = TrackingAllocator::new(System);
        let layout = test_layout(512);

        let before = memory_stats();
        let ptr = unsafe { allocator.alloc(layout) };
        assert!(!ptr.is_null());

        let during = memory_stats();
        assert!(during.total_allocations >= before.total_allocations + 1);

        unsafe { allocator.dealloc(ptr, layout) };
        let after = memory_stats();
        assert!(after.total_deallocations >= before.total_deallocations + 1);
    }

    #[test]
    fn zeroed_alloc_really_is_zeroed() {
        let allocator = TrackingAllocator::new(System);
        let layout = test_layout(64);

        let ptr = unsafe { allocator.alloc_zeroed(layout) };
        assert!(!ptr.is_null());

        // SAFETY: just allocated with this exact layout.
        let bytes = unsafe { std::slice::from_raw_parts(ptr, 64) };
        assert!(bytes.iter().all(|&byte| byte == 0));

        unsafe { allocator.dealloc(ptr, layout) };
    }

    #[test]
    fn realloc_survives_grow_and_shrink() {
        let allocator = TrackingAllocator::new(System);
        let layout = test_layout(128);

        let ptr = unsafe { allocator.alloc(layout) };
        assert!(!ptr.is_null());

        let grown = unsafe { allocator.realloc(ptr, layout, 256) };
        assert!(!grown.is_null());

        let grown_layout = test_layout(256);
        let shrunk = unsafe { allocator.realloc(grown, grown_layout, 32) };
        assert!(!shrunk.is_null());

        unsafe { allocator.dealloc(shrunk, test_layout(32)) };

        // Totals are monotone, so this holds even with concurrent tests.
        let stats = memory_stats();
        assert!(stats.total_allocations >= 1);
        assert!(stats.total_deallocations >= 1);
    }
}
