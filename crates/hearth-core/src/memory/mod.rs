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

//! Provides a public interface for querying host-wide memory allocation statistics.
//!
//! This module defines a set of global atomic counters for memory tracking.
//! It forms a contract where every allocation path in the host reports into
//! the counters: the tagged block allocator in [`tagged`] and the optional
//! [`TrackingAllocator`](tracking::TrackingAllocator) installed as the
//! process global allocator. Any part of the host can read them in a
//! thread-safe manner to monitor memory usage.

pub mod tagged;
pub mod tracking;

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

// --- Global Memory Counters ---

/// Tracks the total number of bytes currently allocated.
pub static CURRENTLY_ALLOCATED_BYTES: AtomicUsize = AtomicUsize::new(0);

/// Tracks the peak number of bytes ever allocated simultaneously.
pub static PEAK_ALLOCATED_BYTES: AtomicU64 = AtomicU64::new(0);

/// Tracks the total number of allocation calls made.
pub static TOTAL_ALLOCATIONS: AtomicU64 = AtomicU64::new(0);

/// Tracks the total number of deallocation calls made.
pub static TOTAL_DEALLOCATIONS: AtomicU64 = AtomicU64::new(0);

// --- Data Structures for Reporting ---

/// A snapshot of the global memory counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryStats {
    /// The total number of bytes currently in use.
    pub current_allocated_bytes: usize,
    /// The maximum number of bytes that were ever in use simultaneously.
    pub peak_allocated_bytes: u64,
    /// The total number of times an allocation was requested.
    pub total_allocations: u64,
    /// The total number of times a deallocation was requested.
    pub total_deallocations: u64,
    /// The net number of live allocations.
    pub net_allocations: i64,
}

// --- Public API for Reading Stats ---

/// Takes a snapshot of all global memory counters.
///
/// All reads use `Ordering::Relaxed`; the snapshot is consistent enough for
/// telemetry but is not a synchronization point.
pub fn memory_stats() -> MemoryStats {
    let total_allocs = TOTAL_ALLOCATIONS.load(Ordering::Relaxed);
    let total_deallocs = TOTAL_DEALLOCATIONS.load(Ordering::Relaxed);

    MemoryStats {
        current_allocated_bytes: CURRENTLY_ALLOCATED_BYTES.load(Ordering::Relaxed),
        peak_allocated_bytes: PEAK_ALLOCATED_BYTES.load(Ordering::Relaxed),
        total_allocations: total_allocs,
        total_deallocations: total_deallocs,
        net_allocations: total_allocs as i64 - total_deallocs as i64,
    }
}

/// Gets the total number of bytes currently allocated.
///
/// This is a lightweight alternative to [`memory_stats`] for when only the
/// current usage is needed.
pub fn current_allocated_bytes() -> usize {
    CURRENTLY_ALLOCATED_BYTES.load(Ordering::Relaxed)
}

// --- Counter Maintenance (allocator-facing) ---

/// Records a completed allocation of `size` bytes.
pub(crate) fn record_alloc(size: usize) {
    TOTAL_ALLOCATIONS.fetch_add(1, Ordering::Relaxed);

    // fetch_update keeps the add atomic and lets us catch overflow instead
    // of wrapping the counter.
    let result =
        CURRENTLY_ALLOCATED_BYTES.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
            current.checked_add(size)
        });

    match result {
        Ok(previous) => update_peak(previous + size),
        Err(_) => log::error!("Memory tracking counter overflowed during alloc! Size: {size}"),
    }
}

/// Records a completed deallocation of `size` bytes.
pub(crate) fn record_dealloc(size: usize) {
    TOTAL_DEALLOCATIONS.fetch_add(1, Ordering::Relaxed);

    let result =
        CURRENTLY_ALLOCATED_BYTES.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
            current.checked_sub(size)
        });

    if result.is_err() {
        log::error!("Memory tracking counter underflowed during dealloc! Size: {size}");
    }
}

/// Raises the peak counter to `candidate` if it exceeds the recorded peak.
pub(crate) fn update_peak(candidate: usize) {
    PEAK_ALLOCATED_BYTES.fetch_max(candidate as u64, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The counters only ever grow, so a snapshot taken after another one
    /// must never report smaller totals, regardless of what other test
    /// threads allocate in between.
    #[test]
    fn snapshot_totals_are_monotonic() {
        let first = memory_stats();
        record_alloc(64);
        record_dealloc(64);
        let second = memory_stats();

        assert!(second.total_allocations >= first.total_allocations + 1);
        assert!(second.total_deallocations >= first.total_deallocations + 1);
        assert!(second.peak_allocated_bytes >= first.peak_allocated_bytes);
    }

    #[test]
    fn net_allocations_is_allocs_minus_deallocs() {
        let stats = memory_stats();
        assert_eq!(
            stats.net_allocations,
            stats.total_allocations as i64 - stats.total_deallocations as i64
        );
    }
}
