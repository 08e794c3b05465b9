//! # Pattern Error Types
//!
//! The engine itself never fails: bad configuration values are clamped and
//! indices wrap. Errors only come from turning configuration text into an
//! [`EngineConfig`](crate::config::EngineConfig) and back.

use thiserror::Error;

/// Errors that can occur around the pattern engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Configuration text could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be encoded as TOML.
    #[error("configuration encoding failed: {0}")]
    ConfigEncode(String),
}

/// Result type for pattern operations.
pub type PatternResult<T> = Result<T, PatternError>;
