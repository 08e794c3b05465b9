//! # Double-Buffered Sequence
//!
//! Lock-free concurrent access for one republishing writer and any number
//! of real-time readers.
//!
//! ## Safety Note
//!
//! This module requires unsafe code for the slot cells.
//! All unsafe blocks are carefully reviewed and documented.

#![allow(unsafe_code)]
//!
//! ## Architecture
//!
//! ```text
//!                    ┌─────────────────────────────┐
//!                    │       DoubleBuffer<T>       │
//!                    │                             │
//!                    │  ┌─────────┐  ┌─────────┐   │
//!                    │  │ Slot 0  │  │ Slot 1  │   │
//!                    │  │ readers │  │ readers │   │
//!                    │  └────┬────┘  └────┬────┘   │
//!                    │       │            │        │
//!                    │  ┌────┴────────────┴────┐   │
//!                    │  │ Atomic Active (0/1)  │   │
//!                    │  └──────────────────────┘   │
//!                    └─────────────────────────────┘
//!                              │
//!              ┌───────────────┴───────────────┐
//!              ▼                               ▼
//!      ┌──────────────┐                ┌──────────────┐
//!      │   publish    │                │ read/read_at │
//!      │  (Control)   │                │  (Render)    │
//!      └──────────────┘                └──────────────┘
//! ```
//!
//! ## Memory Ordering
//!
//! - The writer fills the standby slot, then flips `active` with a store
//!   that is at least `Release`.
//! - A reader loads `active` with at least `Acquire` before touching a
//!   slot, so observing the flip implies observing the complete slot.
//! - Each slot carries a pin count. Readers pin the slot they read and
//!   re-check `active`; the writer waits for the standby slot's pins to
//!   drain before overwriting it. Both sides use `SeqCst` for the
//!   pin/check pair so a late reader can never land inside a slot that is
//!   being rewritten.

use std::cell::UnsafeCell;
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use super::error::{SyncError, SyncResult};

/// Two-slot sequence cache with an atomic active-slot selector.
///
/// Exactly one slot is active and fully valid at any time. `publish`
/// overwrites the standby slot and only then makes it active, so a reader
/// sees either the previous snapshot or the new one, never a mix.
///
/// ## Usage
///
/// ```rust,ignore
/// let buffer = DoubleBuffer::new(vec![0.0_f32; 4]);
///
/// // Control thread
/// buffer.publish(vec![1.0, 0.0, 1.0, 0.0])?;
///
/// // Render thread
/// let step = buffer.read_at(tick).unwrap_or_default();
/// ```
///
/// ## Writer Discipline
///
/// At most one thread may publish at a time. A concurrent second publisher
/// is rejected with [`SyncError::PublishContended`] instead of corrupting
/// the standby slot. A thread must not hold a [`BufferReadGuard`] across
/// two of its own publishes: the second publish waits for that guard.
pub struct DoubleBuffer<T> {
    /// The two sequence slots.
    /// Using UnsafeCell because writers only touch the unpinned standby slot.
    slots: [UnsafeCell<Vec<T>>; 2],

    /// Index of the active slot (0 or 1).
    active: AtomicUsize,

    /// Number of readers currently pinning each slot.
    readers: [AtomicUsize; 2],

    /// Whether a publish is in flight.
    publishing: AtomicBool,

    /// Number of completed publishes.
    generation: AtomicU64,
}

impl<T: Clone> DoubleBuffer<T> {
    /// Creates a buffer whose two slots both hold `initial`.
    #[must_use]
    pub fn new(initial: Vec<T>) -> Self {
        Self::from_slots(initial.clone(), initial)
    }
}

impl<T> DoubleBuffer<T> {
    /// Creates a buffer from an active and a standby slot.
    #[must_use]
    pub fn from_slots(active: Vec<T>, standby: Vec<T>) -> Self {
        Self {
            slots: [UnsafeCell::new(active), UnsafeCell::new(standby)],
            active: AtomicUsize::new(0),
            readers: [AtomicUsize::new(0), AtomicUsize::new(0)],
            publishing: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }

    /// Pins the active slot and returns a view into it.
    ///
    /// Never allocates. Retries only if a publish flips the selector between
    /// the load and the pin, which a single writer can cause at most once
    /// per publish.
    #[inline]
    #[must_use]
    pub fn read(&self) -> BufferReadGuard<'_, T> {
        let slot = self.pin();
        BufferReadGuard { buffer: self, slot }
    }

    /// Length of the active sequence.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the active sequence is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of completed publishes since construction.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Index of the active slot (for debugging).
    #[inline]
    #[must_use]
    pub fn active_slot(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Number of read guards currently alive across both slots.
    #[inline]
    #[must_use]
    pub fn pinned_readers(&self) -> usize {
        self.readers[0].load(Ordering::Acquire) + self.readers[1].load(Ordering::Acquire)
    }

    /// Writes `value` into the standby slot, then makes it active.
    ///
    /// Waits (spinning) only for readers still pinning the standby slot,
    /// which hold it for the length of a single read.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::PublishContended`] if another publish is in
    /// flight on this buffer. `value` is dropped in that case.
    pub fn publish(&self, value: Vec<T>) -> SyncResult<()> {
        if self.publishing.swap(true, Ordering::Acquire) {
            return Err(SyncError::PublishContended {
                generation: self.generation(),
            });
        }

        let standby = self.active.load(Ordering::Acquire) ^ 1;

        // Readers that pinned the standby slot before the last flip.
        while self.readers[standby].load(Ordering::SeqCst) != 0 {
            std::hint::spin_loop();
        }

        // SAFETY: `publishing` makes this the only writer, the standby slot is
        // not active, and its pin count is zero. Any reader that pins it from
        // now on re-checks `active`, sees the other slot, and backs off
        // without dereferencing.
        unsafe {
            *self.slots[standby].get() = value;
        }

        self.active.store(standby, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.publishing.store(false, Ordering::Release);
        Ok(())
    }

    /// Pins the active slot, returning its index.
    #[inline]
    fn pin(&self) -> usize {
        loop {
            let slot = self.active.load(Ordering::Acquire);
            self.readers[slot].fetch_add(1, Ordering::SeqCst);
            if self.active.load(Ordering::SeqCst) == slot {
                return slot;
            }
            // Flipped under us: the slot may be rewritten next.
            self.readers[slot].fetch_sub(1, Ordering::Release);
        }
    }

    /// Gets a reference to a pinned slot.
    ///
    /// # Safety
    ///
    /// Caller must hold a pin on `slot` obtained through `pin`.
    #[inline]
    unsafe fn slot(&self, slot: usize) -> &[T] {
        &*self.slots[slot].get()
    }
}

impl<T: Copy> DoubleBuffer<T> {
    /// Returns the element at `index` modulo the active length.
    ///
    /// Returns `None` only when the active sequence is empty.
    #[inline]
    #[must_use]
    pub fn read_at(&self, index: usize) -> Option<T> {
        let guard = self.read();
        if guard.is_empty() {
            None
        } else {
            Some(guard[index % guard.len()])
        }
    }
}

impl<T: Clone> DoubleBuffer<T> {
    /// Copies the active sequence out of the buffer.
    ///
    /// Allocates; meant for control code, not the read path.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.read().to_vec()
    }
}

impl<T> Default for DoubleBuffer<T> {
    fn default() -> Self {
        Self::from_slots(Vec::new(), Vec::new())
    }
}

impl<T> std::fmt::Debug for DoubleBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DoubleBuffer")
            .field("active", &self.active_slot())
            .field("len", &self.len())
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}

// SAFETY: slots are only written by the single publisher while unpinned and
// inactive; every other access is a shared read of a pinned slot.
unsafe impl<T: Send + Sync> Sync for DoubleBuffer<T> {}

/// Read guard pinning one slot of a [`DoubleBuffer`].
///
/// Dereferences to the slot's sequence. The slot is never rewritten while
/// the guard is alive, so drop it promptly.
pub struct BufferReadGuard<'a, T> {
    buffer: &'a DoubleBuffer<T>,
    slot: usize,
}

impl<T> BufferReadGuard<'_, T> {
    /// Returns the slot index this guard pins (for debugging).
    #[inline]
    #[must_use]
    pub fn slot_index(&self) -> usize {
        self.slot
    }
}

impl<T> Deref for BufferReadGuard<'_, T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        // SAFETY: this guard holds the pin taken in `DoubleBuffer::read`.
        unsafe { self.buffer.slot(self.slot) }
    }
}

impl<T> Drop for BufferReadGuard<'_, T> {
    fn drop(&mut self) {
        self.buffer.readers[self.slot].fetch_sub(1, Ordering::Release);
    }
}
