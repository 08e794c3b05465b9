//! # Stepwise Core
//!
//! Publication primitives for real-time readers:
//! - Lock-free reads on the hot path
//! - No allocation when reading
//! - One republishing writer per buffer
//!
//! ## Architecture Rules
//!
//! 1. **Readers never wait on writers** - A read always sees one complete snapshot
//! 2. **Writers never mutate a visible slot** - New data goes to the hidden slot first
//! 3. **Out-of-range indices wrap** - Indexing is modulo the current length
//!
//! ## Example
//!
//! ```rust,ignore
//! use stepwise_core::DoubleBuffer;
//!
//! let buffer = DoubleBuffer::new(vec![0.0_f32; 16]);
//! buffer.publish(vec![1.0; 8])?;
//! assert_eq!(buffer.read_at(9), Some(1.0));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod sync;

pub use sync::{BufferReadGuard, DoubleBuffer, SyncError, SyncResult};
