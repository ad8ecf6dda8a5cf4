//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// The error type for `tp-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The configuration cannot start a run (bad scenario tag, missing or
    /// out-of-range parameter).
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `tp-core`.
pub type CoreResult<T> = Result<T, CoreError>;
