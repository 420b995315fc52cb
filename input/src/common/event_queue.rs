// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A growable FIFO ring buffer. Unlike [`RingBufferHeap`] style fixed buffers that
//! overwrite the oldest item when full, this one doubles its capacity and never drops
//! anything it accepted.
//!
//! [`RingBufferHeap`]: https://docs.rs/r3bl_tui/latest/r3bl_tui/struct.RingBufferHeap.html

use std::{collections::TryReserveError, fmt::Debug};

/// Returned by [`EventQueue::push`] when the backing storage could not grow. The item
/// that did not fit is handed back to the caller.
#[derive(Debug)]
pub struct QueueGrowError<T> {
    pub item: T,
    pub source: TryReserveError,
}

/// FIFO ring buffer with a power-of-two capacity.
///
/// # Invariants
///
/// - `internal_storage.len()` is the capacity and is always a power of two.
/// - `count` live items start at `out_index` and run (wrapping) up to, but not
///   including, `in_index`. When `count == capacity`, `in_index == out_index`.
///
/// # Growth
///
/// Growth only happens when the buffer is full, so `in_index == out_index`. Doubling
/// the storage appends empty slots at the end; the live region must then be made
/// contiguous again, in order:
///
/// ```text
/// full, out == 0:           [A B C D] ──► [A B C D . . . .]   in = 4
/// full, out == 2 (wrapped): [C D A B] ──► [C D . . . . A B]   out = 6
/// ```
///
/// In the wrapped case the tail segment `[out..old_capacity)` moves to the end of the
/// new storage; the head segment stays where it is.
#[derive(Debug)]
pub struct EventQueue<T> {
    internal_storage: Vec<Option<T>>,
    in_index: usize,
    out_index: usize,
    count: usize,
}

impl<T> EventQueue<T> {
    /// # Panics
    ///
    /// Panics if `capacity` is not a non-zero power of two. [`ContextConfig`] validates
    /// this before a queue is ever built.
    ///
    /// [`ContextConfig`]: crate::ContextConfig
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity.is_power_of_two(),
            "event queue capacity must be a power of two, got {capacity}"
        );
        let mut internal_storage = Vec::with_capacity(capacity);
        internal_storage.resize_with(capacity, || None);
        Self {
            internal_storage,
            in_index: 0,
            out_index: 0,
            count: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize { self.count }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.count == 0 }

    #[must_use]
    pub fn capacity(&self) -> usize { self.internal_storage.len() }

    /// Appends at the write cursor, doubling the storage first if it is full.
    ///
    /// # Errors
    ///
    /// Returns [`QueueGrowError`] (with the item) if the storage could not grow. The
    /// queue is unchanged in that case.
    pub fn push(&mut self, item: T) -> Result<(), QueueGrowError<T>> {
        if self.count == self.capacity() {
            if let Err(source) = self.grow() {
                return Err(QueueGrowError { item, source });
            }
        }

        self.internal_storage[self.in_index] = Some(item);
        self.in_index = (self.in_index + 1) % self.capacity();
        self.count += 1;
        Ok(())
    }

    /// Removes the oldest item.
    pub fn pop(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }
        let item = self.internal_storage[self.out_index].take();
        self.out_index = (self.out_index + 1) % self.capacity();
        self.count -= 1;
        item
    }

    /// The oldest item, without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        if self.count == 0 {
            return None;
        }
        self.internal_storage[self.out_index].as_ref()
    }

    fn grow(&mut self) -> Result<(), TryReserveError> {
        let old_capacity = self.capacity();
        let new_capacity = old_capacity * 2;

        self.internal_storage.try_reserve_exact(old_capacity)?;
        self.internal_storage.resize_with(new_capacity, || None);

        if self.count > 0 && self.in_index == 0 {
            // Live region is [0..old_capacity), already in order.
            self.in_index = old_capacity;
        } else if self.count > 0 && self.out_index >= self.in_index {
            // Wrapped: move the tail segment to the end of the new storage. Rotating
            // the suffix brings the (empty) new half in front of the tail segment.
            let move_len = old_capacity - self.out_index;
            let new_out_index = new_capacity - move_len;
            self.internal_storage[self.out_index..].rotate_right(old_capacity);
            self.out_index = new_out_index;
        }

        Ok(())
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self { Self::with_capacity(4) }
}
