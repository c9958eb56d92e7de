mod diff;
mod entity;
mod extraction;
mod project;
mod query;

pub use diff::DiffCommands;
pub use entity::EntityCommands;
pub use extraction::ExtractionCommands;
pub use project::ProjectCommands;
pub use query::QueryCommands;
