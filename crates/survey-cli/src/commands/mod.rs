pub mod diff;
pub mod dispatch;
pub mod entity;
pub mod extraction;
pub mod gaps;
pub mod project;
pub mod query;
pub mod schema;
pub mod shared;
