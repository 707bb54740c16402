/// Domain error type for tipping operations.
use thiserror::Error;

use crate::backend::BackendError;

/// Typed error enum for tipping operations, allowing callers to match on
/// specific failure modes instead of inspecting opaque `anyhow::Error` messages.
#[derive(Debug, Error)]
pub enum TipError {
    /// Recipient is not a well-formed address for the active network.
    #[error("{0}")]
    InvalidRecipient(String),

    /// Amount is empty, negative, zero, non-numeric, or too large.
    #[error("{0}")]
    InvalidAmount(String),

    /// Backend request failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Session file error.
    #[error("{0}")]
    Storage(String),

    /// Operation not allowed in the current session or flow state.
    #[error("{0}")]
    InvalidState(String),

    /// Unexpected error from internal subsystems.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Alias for `std::result::Result<T, TipError>`.
pub type Result<T> = std::result::Result<T, TipError>;
