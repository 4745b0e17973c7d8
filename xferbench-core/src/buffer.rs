// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! TransferBuffer - the user-space staging area for chunked mechanisms.
//!
//! The direct mechanism requires the buffer's address to sit on a 512-byte
//! boundary, which `Vec<u8>` cannot guarantee, so the buffer owns a raw
//! allocation with an explicit alignment. All unsafe operations are
//! encapsulated; the region is zero-initialized and released on drop.

use std::alloc::{alloc_zeroed, dealloc, handle_alloc_error, Layout};
use std::ptr::NonNull;

/// A byte region sized and aligned for one transfer run.
pub struct TransferBuffer {
    ptr: NonNull<u8>,
    layout: Layout,
}

impl TransferBuffer {
    /// Allocate `size` bytes with no alignment requirement beyond the
    /// allocator's own.
    pub fn new(size: usize) -> Self {
        Self::aligned(size, 1)
    }

    /// Allocate `size` bytes whose starting address is a multiple of
    /// `alignment`.
    ///
    /// # Panics
    /// Panics if `size` is zero or `alignment` is not a power of two; both
    /// are rejected by configuration validation long before this point.
    pub fn aligned(size: usize, alignment: usize) -> Self {
        // A zero-size layout must never reach the allocator.
        assert!(size > 0, "transfer buffer size must be positive");
        let layout = Layout::from_size_align(size, alignment)
            .expect("buffer alignment validated at configuration time");

        // SAFETY: layout has non-zero size, checked above via the validated
        // BufferSize that produced `size`.
        let raw = unsafe { alloc_zeroed(layout) };
        let Some(ptr) = NonNull::new(raw) else {
            handle_alloc_error(layout);
        };

        Self { ptr, layout }
    }

    /// Size of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.layout.size()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.size() == 0
    }

    /// View the buffer as a mutable byte slice.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: ptr is valid for layout.size() bytes and exclusively owned.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.layout.size()) }
    }

    /// View the buffer as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: ptr is valid for layout.size() bytes.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.layout.size()) }
    }
}

impl Drop for TransferBuffer {
    fn drop(&mut self) {
        // SAFETY: ptr and layout were produced together by alloc_zeroed.
        unsafe { dealloc(self.ptr.as_ptr(), self.layout) };
    }
}
