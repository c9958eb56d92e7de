//! The extraction store contract consumed by the analysis engine.
//!
//! The engine never writes: it asks the store for one consistent bulk snapshot
//! per logical operation and reduces it in memory. Implementations:
//! - [`MemoryStore`]: in-process collections, for tests and embedding
//! - `survey_db::SurveyDb`: libSQL-backed persistence

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Entity, EntityCoverage, ExtractionRecord, Project};
use crate::enums::{ExtractionStatus, SchemaType};
use crate::errors::CoreError;

/// Criteria for [`ExtractionStore::list_extractions`]. Unset fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionFilter {
    pub entity_id: Option<String>,
    pub entity_ids: Option<Vec<String>>,
    pub project_id: Option<String>,
    pub schema_type: Option<SchemaType>,
    pub status: Option<ExtractionStatus>,
    /// Only extractions captured at or after this instant.
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
}

impl ExtractionFilter {
    /// Completed extractions across a project, optionally for one schema type.
    #[must_use]
    pub fn completed_in_project(project_id: &str, schema_type: Option<SchemaType>) -> Self {
        Self {
            project_id: Some(project_id.to_string()),
            schema_type,
            status: Some(ExtractionStatus::Completed),
            ..Self::default()
        }
    }

    /// Check a record against every set criterion except `project_id` and `limit`,
    /// which need entity context and ordering respectively.
    #[must_use]
    pub fn admits(&self, record: &ExtractionRecord) -> bool {
        self.entity_id
            .as_deref()
            .is_none_or(|id| record.entity_id == id)
            && self
                .entity_ids
                .as_ref()
                .is_none_or(|ids| ids.iter().any(|id| *id == record.entity_id))
            && self.schema_type.is_none_or(|schema| record.schema_type == schema)
            && self.status.is_none_or(|status| record.status == status)
            && self.since.is_none_or(|since| record.extracted_at >= since)
    }
}

/// Read access to projects, entities, and extractions.
#[async_trait]
pub trait ExtractionStore: Send + Sync {
    /// Look up a project by ID.
    async fn get_project(&self, id: &str) -> Result<Option<Project>, CoreError>;

    /// Look up an entity by ID.
    async fn get_entity(&self, id: &str) -> Result<Option<Entity>, CoreError>;

    /// Look up an extraction by ID, joined with its entity and source.
    async fn get_extraction(&self, id: &str) -> Result<Option<ExtractionRecord>, CoreError>;

    /// List extractions matching `filter`, most recently captured first.
    async fn list_extractions(
        &self,
        filter: &ExtractionFilter,
    ) -> Result<Vec<ExtractionRecord>, CoreError>;

    /// List a project's entities by name, each with its completed schema types.
    async fn list_entities(&self, project_id: &str) -> Result<Vec<EntityCoverage>, CoreError>;

    /// Fetch the entities with the given IDs. Unknown IDs are skipped.
    async fn get_entities(&self, ids: &[String]) -> Result<Vec<Entity>, CoreError>;
}
