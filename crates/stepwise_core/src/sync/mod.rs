//! # Synchronization Primitives for Real-Time Readers
//!
//! No locks on the read path. No torn snapshots.
//!
//! ## The Problem
//!
//! ```text
//! Thread 1 (Control):  REPUBLISH a sequence (resize, resample)
//! Thread 2 (Render):   READ the sequence every tick
//!
//! Without synchronization: TORN READ → GARBAGE / OUT OF BOUNDS
//! With Mutex:              PRIORITY INVERSION → MISSED DEADLINE
//! ```
//!
//! ## The Solution: Double Buffering
//!
//! ```text
//! Publish N:
//!   Control writes slot B (hidden)
//!   Render reads slot A (active)
//!   FLIP (release store of the active index)
//!
//! Publish N+1:
//!   Control writes slot A (hidden once its readers drain)
//!   Render reads slot B
//! ```

mod double_buffer;
mod error;

pub use double_buffer::{BufferReadGuard, DoubleBuffer};
pub use error::{SyncError, SyncResult};
