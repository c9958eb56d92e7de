//! Entity repository.

use chrono::Utc;
use survey_core::entities::Entity;
use survey_core::ids::PREFIX_ENTITY;

use crate::SurveyDb;
use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_opt_string, parse_datetime, placeholders};

pub(crate) const SELECT_COLS: &str = "id, project_id, name, entity_type, url, created_at";

pub(crate) fn row_to_entity(row: &libsql::Row) -> Result<Entity, DatabaseError> {
    Ok(Entity {
        id: row.get::<String>(0)?,
        project_id: row.get::<String>(1)?,
        name: row.get::<String>(2)?,
        entity_type: get_opt_string(row, 3)?,
        url: get_opt_string(row, 4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

async fn collect(mut rows: libsql::Rows) -> Result<Vec<Entity>, DatabaseError> {
    let mut results = Vec::new();
    while let Some(row) = rows.next().await? {
        results.push(row_to_entity(&row)?);
    }
    Ok(results)
}

impl SurveyDb {
    /// Add an entity to a project.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the project does not exist.
    pub async fn create_entity(
        &self,
        project_id: &str,
        name: &str,
        entity_type: Option<&str>,
        url: Option<&str>,
    ) -> Result<Entity, DatabaseError> {
        if self.get_project(project_id).await?.is_none() {
            return Err(DatabaseError::NotFound {
                entity_type: "project".into(),
                id: project_id.to_string(),
            });
        }

        let now = Utc::now();
        let id = self.generate_id(PREFIX_ENTITY).await?;
        self.execute(
            "INSERT INTO entities (id, project_id, name, entity_type, url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            libsql::params![id.as_str(), project_id, name, entity_type, url, format_datetime(now)],
        )
        .await?;

        tracing::debug!(entity_id = %id, project_id, "created entity");
        Ok(Entity {
            id,
            project_id: project_id.to_string(),
            name: name.to_string(),
            entity_type: entity_type.map(String::from),
            url: url.map(String::from),
            created_at: now,
        })
    }

    pub async fn get_entity(&self, id: &str) -> Result<Option<Entity>, DatabaseError> {
        let sql = format!("SELECT {SELECT_COLS} FROM entities WHERE id = ?1");
        let mut rows = self.query(&sql, [id]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_entity(&row)?)),
            None => Ok(None),
        }
    }

    /// Entities of a project, ordered by name.
    pub async fn list_project_entities(&self, project_id: &str) -> Result<Vec<Entity>, DatabaseError> {
        let sql = format!("SELECT {SELECT_COLS} FROM entities WHERE project_id = ?1 ORDER BY name, id");
        collect(self.query(&sql, [project_id]).await?).await
    }

    /// Fetch entities by ID. Unknown IDs are skipped.
    pub async fn get_entities_by_ids(&self, ids: &[String]) -> Result<Vec<Entity>, DatabaseError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {SELECT_COLS} FROM entities WHERE id IN ({}) ORDER BY name, id",
            placeholders(1, ids.len())
        );
        let params: Vec<libsql::Value> = ids.iter().map(|id| id.as_str().into()).collect();
        collect(self.query(&sql, libsql::params_from_iter(params)).await?).await
    }
}
