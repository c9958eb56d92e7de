//! Cross-cutting error types for Survey.
//!
//! Domain-specific errors (`DatabaseError`, `AnalysisError`, `ConfigError`) are
//! defined in their respective crates. Store implementations surface their
//! failures through `CoreError` so the analysis engine stays storage-agnostic.

use thiserror::Error;

/// Errors that can be raised by any Survey crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (unknown enum value, bad format).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The backing extraction store failed.
    #[error("Store error: {0}")]
    Store(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
