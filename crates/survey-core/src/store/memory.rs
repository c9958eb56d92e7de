//! In-memory extraction store for testing and embedding.

use std::collections::HashMap;

use async_trait::async_trait;

use super::{ExtractionFilter, ExtractionStore};
use crate::entities::{Entity, EntityCoverage, ExtractionRecord, Project};
use crate::errors::CoreError;

/// In-memory collections of projects, entities, and extractions.
///
/// Populated up front through the `insert_*` methods; read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    projects: HashMap<String, Project>,
    entities: Vec<Entity>,
    extractions: Vec<ExtractionRecord>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_project(&mut self, project: Project) {
        self.projects.insert(project.id.clone(), project);
    }

    /// Insert or replace an entity.
    pub fn insert_entity(&mut self, entity: Entity) {
        self.entities.retain(|existing| existing.id != entity.id);
        self.entities.push(entity);
    }

    pub fn insert_extraction(&mut self, record: ExtractionRecord) {
        self.extractions.push(record);
    }

    #[must_use]
    pub fn extraction_count(&self) -> usize {
        self.extractions.len()
    }

    fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    fn in_project(&self, record: &ExtractionRecord, project_id: &str) -> bool {
        self.entity(&record.entity_id)
            .is_some_and(|entity| entity.project_id == project_id)
    }
}

#[async_trait]
impl ExtractionStore for MemoryStore {
    async fn get_project(&self, id: &str) -> Result<Option<Project>, CoreError> {
        Ok(self.projects.get(id).cloned())
    }

    async fn get_entity(&self, id: &str) -> Result<Option<Entity>, CoreError> {
        Ok(self.entity(id).cloned())
    }

    async fn get_extraction(&self, id: &str) -> Result<Option<ExtractionRecord>, CoreError> {
        Ok(self.extractions.iter().find(|ext| ext.id == id).cloned())
    }

    async fn list_extractions(
        &self,
        filter: &ExtractionFilter,
    ) -> Result<Vec<ExtractionRecord>, CoreError> {
        let mut rows: Vec<ExtractionRecord> = self
            .extractions
            .iter()
            .filter(|record| filter.admits(record))
            .filter(|record| {
                filter
                    .project_id
                    .as_deref()
                    .is_none_or(|project_id| self.in_project(record, project_id))
            })
            .cloned()
            .collect();

        rows.sort_by(|a, b| b.extracted_at.cmp(&a.extracted_at));
        if let Some(limit) = filter.limit {
            rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(rows)
    }

    async fn list_entities(&self, project_id: &str) -> Result<Vec<EntityCoverage>, CoreError> {
        let mut entities: Vec<EntityCoverage> = self
            .entities
            .iter()
            .filter(|entity| entity.project_id == project_id)
            .map(|entity| EntityCoverage {
                entity: entity.clone(),
                schemas: self
                    .extractions
                    .iter()
                    .filter(|ext| ext.entity_id == entity.id && ext.is_completed())
                    .map(|ext| ext.schema_type)
                    .collect(),
            })
            .collect();

        entities.sort_by(|a, b| a.entity.name.cmp(&b.entity.name));
        Ok(entities)
    }

    async fn get_entities(&self, ids: &[String]) -> Result<Vec<Entity>, CoreError> {
        Ok(self
            .entities
            .iter()
            .filter(|entity| ids.contains(&entity.id))
            .cloned()
            .collect())
    }
}
