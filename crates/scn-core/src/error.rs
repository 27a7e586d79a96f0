//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed shape {shape:?}: {reason}")]
    Shape { shape: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `scn-core`.
pub type CoreResult<T> = Result<T, CoreError>;
