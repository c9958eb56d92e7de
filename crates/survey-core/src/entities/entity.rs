use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SchemaType;

/// A researched subject (company, product, tool) inside a project.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Entity {
    pub id: String,
    pub project_id: String,
    pub name: String,
    /// Free-form classification: `company`, `product`, `tool`.
    pub entity_type: Option<String>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Entity {
    /// Whether the entity has a URL that automated research can start from.
    #[must_use]
    pub fn has_url(&self) -> bool {
        self.url.as_deref().is_some_and(|url| !url.trim().is_empty())
    }
}

/// An entity together with the schema types of its completed extractions.
///
/// `schemas` may repeat a type once per completed capture; consumers that need
/// a set must deduplicate.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EntityCoverage {
    pub entity: Entity,
    pub schemas: Vec<SchemaType>,
}
