//! Entity structs for all Survey domain objects.
//!
//! Each entity maps to a table in the libSQL database (see `survey-db` migrations).
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip
//! and schema validation.

mod entity;
mod extraction;
mod project;

pub use entity::{Entity, EntityCoverage};
pub use extraction::ExtractionRecord;
pub use project::Project;
