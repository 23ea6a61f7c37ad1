//! Error types for fogmap.

use thiserror::Error;

/// Errors produced by the exploration grid store and the compression codec.
#[derive(Error, Debug)]
pub enum FogmapError {
    /// The compression primitive produced no complete output on its single
    /// attempt. Encode failures are surfaced, never retried.
    #[error("compression produced no output")]
    EncodeFailed,

    /// Decompression failed: either the input is corrupt, or no sufficient
    /// output buffer was found within the retry budget.
    #[error("decompression failed")]
    DecodeFailed,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias for fogmap operations.
pub type Result<T> = std::result::Result<T, FogmapError>;
