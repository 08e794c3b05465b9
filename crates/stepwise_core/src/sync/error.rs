//! Errors raised by the publication primitives.

use thiserror::Error;

/// Errors that can occur while publishing into a double buffer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncError {
    /// Another publish was already in flight on the same buffer.
    ///
    /// The snapshot handed to the losing call is dropped; the buffer keeps
    /// whatever the in-flight publisher writes.
    #[error("publish already in progress on this buffer (generation {generation})")]
    PublishContended {
        /// Generation observed when the publish was rejected.
        generation: u64,
    },
}

/// Result type for publication operations.
pub type SyncResult<T> = Result<T, SyncError>;
