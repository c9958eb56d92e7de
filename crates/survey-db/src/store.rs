//! [`ExtractionStore`] implementation over libSQL.

use std::collections::HashMap;

use async_trait::async_trait;
use survey_core::entities::{Entity, EntityCoverage, ExtractionRecord, Project};
use survey_core::enums::SchemaType;
use survey_core::errors::CoreError;
use survey_core::store::{ExtractionFilter, ExtractionStore};

use crate::SurveyDb;

#[async_trait]
impl ExtractionStore for SurveyDb {
    async fn get_project(&self, id: &str) -> Result<Option<Project>, CoreError> {
        Ok(Self::get_project(self, id).await?)
    }

    async fn get_entity(&self, id: &str) -> Result<Option<Entity>, CoreError> {
        Ok(Self::get_entity(self, id).await?)
    }

    async fn get_extraction(&self, id: &str) -> Result<Option<ExtractionRecord>, CoreError> {
        Ok(Self::get_extraction(self, id).await?)
    }

    async fn list_extractions(
        &self,
        filter: &ExtractionFilter,
    ) -> Result<Vec<ExtractionRecord>, CoreError> {
        Ok(Self::list_extractions(self, filter).await?)
    }

    async fn list_entities(&self, project_id: &str) -> Result<Vec<EntityCoverage>, CoreError> {
        let entities = self.list_project_entities(project_id).await?;
        let mut schemas: HashMap<String, Vec<SchemaType>> = HashMap::new();
        for (entity_id, schema) in self.completed_schema_pairs(project_id).await? {
            schemas.entry(entity_id).or_default().push(schema);
        }

        Ok(entities
            .into_iter()
            .map(|entity| EntityCoverage {
                schemas: schemas.remove(&entity.id).unwrap_or_default(),
                entity,
            })
            .collect())
    }

    async fn get_entities(&self, ids: &[String]) -> Result<Vec<Entity>, CoreError> {
        Ok(self.get_entities_by_ids(ids).await?)
    }
}
