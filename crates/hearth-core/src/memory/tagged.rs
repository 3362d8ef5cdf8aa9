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

//! The tagged block allocator: size-prefixed, zero-initialized raw buffers.
//!
//! Every block carries its own total size in a `u64` tag stored immediately
//! before the payload. Releasing a block therefore needs nothing but the
//! payload pointer; the size is read back from memory instead of being
//! passed around. [`RawBlock`] is the owning handle, and dropping it returns
//! the memory, so a block cannot be released twice or used after release.

use std::alloc::{self, Layout};
use std::ptr::NonNull;
use std::slice;

/// Width in bytes of the size tag stored ahead of every payload.
pub const TAG_WIDTH: usize = 8;

/// Alignment of every block; keeps the payload 8-byte aligned as well.
const BLOCK_ALIGN: usize = 8;

/// An owning handle over one tagged heap block.
///
/// The handle addresses the payload. The `u64` size tag lives at
/// `payload - TAG_WIDTH` and records the total block size, payload plus tag.
#[derive(Debug)]
pub struct RawBlock {
    payload: NonNull<u8>,
}

// SAFETY: the handle owns its block exclusively and the OS allocator is
// thread-safe, so moving a block to another thread is sound.
unsafe impl Send for RawBlock {}

/// Allocates a zero-initialized tagged block with a `size`-byte payload.
///
/// Allocation failure is unrecoverable: a FATAL record is written and the
/// process diverts into the global allocation-error path.
pub fn allocate(size: usize) -> RawBlock {
    let total = match size.checked_add(TAG_WIDTH) {
        Some(total) => total,
        None => oversized_request(size),
    };
    let layout = match Layout::from_size_align(total, BLOCK_ALIGN) {
        Ok(layout) => layout,
        Err(_) => oversized_request(size),
    };

    // SAFETY: `layout` has a non-zero size; the tag alone is TAG_WIDTH bytes.
    let base = unsafe { alloc::alloc_zeroed(layout) };
    let Some(base) = NonNull::new(base) else {
        crate::fatal!("Heap exhausted: failed to allocate {total} bytes");
        alloc::handle_alloc_error(layout);
    };

    // SAFETY: the block starts with TAG_WIDTH bytes, and BLOCK_ALIGN keeps
    // the tag slot aligned for a u64 write.
    unsafe {
        base.as_ptr().cast::<u64>().write(total as u64);
    }

    // SAFETY: offsetting by TAG_WIDTH stays inside the allocation.
    let payload = unsafe { NonNull::new_unchecked(base.as_ptr().add(TAG_WIDTH)) };

    super::record_alloc(total);
    RawBlock { payload }
}

/// Releases a block explicitly. Equivalent to dropping the handle.
pub fn release(block: RawBlock) {
    drop(block);
}

impl RawBlock {
    /// Total block size recorded in the tag, payload plus tag bytes.
    fn total_size(&self) -> usize {
        // SAFETY: `allocate` wrote the tag at exactly this offset.
        unsafe { self.payload.as_ptr().sub(TAG_WIDTH).cast::<u64>().read() as usize }
    }

    /// Returns the payload length in bytes.
    pub fn len(&self) -> usize {
        self.total_size() - TAG_WIDTH
    }

    /// Returns `true` if the payload has zero length.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrows the payload as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: the payload spans `len` bytes and was zero-initialized, so
        // every byte is initialized.
        unsafe { slice::from_raw_parts(self.payload.as_ptr(), self.len()) }
    }

    /// Borrows the payload as a mutable byte slice.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as for `as_slice`, and `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.payload.as_ptr(), self.len()) }
    }
}

impl Drop for RawBlock {
    fn drop(&mut self) {
        let total = self.total_size();
        // SAFETY: the tag read back from the block is the total `allocate`
        // created it with, so this rebuilds the original layout, and the base
        // pointer is the start of that allocation.
        unsafe {
            let base = self.payload.as_ptr().sub(TAG_WIDTH);
            let layout = Layout::from_size_align_unchecked(total, BLOCK_ALIGN);
            alloc::dealloc(base, layout);
        }
        super::record_dealloc(total);
    }
}

/// Bails out of an allocation whose size cannot be represented as a layout.
fn oversized_request(size: usize) -> ! {
    crate::fatal!("Refusing tagged allocation of {size} bytes: size overflows the block layout");
    std::process::abort();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{memory_stats, PEAK_ALLOCATED_BYTES};
    use std::sync::atomic::Ordering;

    #[test]
    fn allocation_is_zeroed_and_sized() {
        let block = allocate(256);
        assert_eq!(block.len(), 256);
        assert!(!block.is_empty());
        assert!(block.as_slice().iter().all(|&byte| byte == 0));
    }

    #[test]
    fn payload_round_trips_writes() {
        let mut block = allocate(64);
        block.as_mut_slice()[0] = 0xAB;
        block.as_mut_slice()[63] = 0xCD;
        assert_eq!(block.as_slice()[0], 0xAB);
        assert_eq!(block.as_slice()[63], 0xCD);
    }

    #[test]
    fn zero_size_allocation_is_legal() {
        let block = allocate(0);
        assert_eq!(block.len(), 0);
        assert!(block.is_empty());
        assert!(block.as_slice().is_empty());
        release(block);
    }

    /// The tag is the single source of truth for the release size, and the
    /// counters see both halves of the round trip. Only monotone counters
    /// are asserted so the test tolerates concurrent allocations from other
    /// test threads.
    #[test]
    fn release_recovers_size_from_the_tag() {
        const SIZE: usize = 4096;

        let before = memory_stats();
        let block = allocate(SIZE);

        let during = memory_stats();
        assert!(during.total_allocations >= before.total_allocations + 1);
        // The block is live right now, so the peak must cover it.
        assert!(PEAK_ALLOCATED_BYTES.load(Ordering::Relaxed) as usize >= SIZE + TAG_WIDTH);

        release(block);
        let after = memory_stats();
        assert!(after.total_deallocations >= before.total_deallocations + 1);
    }

    #[test]
    fn blocks_move_across_threads() {
        let mut block = allocate(128);
        block.as_mut_slice()[7] = 42;

        let handle = std::thread::spawn(move || block.as_slice()[7]);
        assert_eq!(handle.join().expect("worker thread panicked"), 42);
    }
}
