//! Repository methods, implemented as `impl SurveyDb` blocks per table.

pub mod entity;
pub mod extraction;
pub mod project;
pub mod source;

pub use extraction::NewExtraction;
