//! # survey-analysis
//!
//! The extraction diff and research-gap engine.
//!
//! Pure reducers over in-memory extraction records:
//! - [`value`]: nested-path lookup, recursive text search, filter predicates
//! - [`diff`]: path-level tree diff between two payloads
//! - [`history`]: recency ordering, dedup, capture history, recent-change scans
//! - [`gaps`]: per-project coverage gaps and research priorities
//! - [`query`] and [`views`]: cross-entity queries and schema-specialized views
//!
//! [`Analyst`] wires them to any [`ExtractionStore`](survey_core::store::ExtractionStore),
//! performing one bulk fetch per operation.

pub mod analyst;
pub mod diff;
pub mod error;
pub mod gaps;
pub mod history;
pub mod query;
pub mod value;
pub mod views;

pub use analyst::Analyst;
pub use error::AnalysisError;
