//! Analysis error types for survey-analysis.

use survey_core::enums::SchemaType;
use survey_core::errors::CoreError;

/// Errors from analysis operations.
///
/// Missing projects, entities, and extractions are not errors: the analyst
/// returns `None` for those.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Error from the extraction store.
    #[error("store error: {0}")]
    Core(#[from] CoreError),

    /// Two extractions of different schema types cannot be diffed.
    #[error("cannot diff a {old} extraction against a {new} extraction")]
    SchemaMismatch { old: SchemaType, new: SchemaType },

    /// Payload nesting went deeper than the configured limit.
    #[error("payload nesting exceeds maximum depth {max_depth} at '{path}'")]
    DepthExceeded { path: String, max_depth: usize },
}
