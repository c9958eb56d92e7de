//! Project repository.

use chrono::Utc;
use survey_core::entities::Project;
use survey_core::ids::PREFIX_PROJECT;

use crate::SurveyDb;
use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_opt_string, parse_datetime};

const SELECT_COLS: &str = "id, name, description, created_at";

fn row_to_project(row: &libsql::Row) -> Result<Project, DatabaseError> {
    Ok(Project {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        description: get_opt_string(row, 2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

impl SurveyDb {
    /// Create a research project.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails.
    pub async fn create_project(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Project, DatabaseError> {
        let now = Utc::now();
        let id = self.generate_id(PREFIX_PROJECT).await?;

        self.execute(
            "INSERT INTO projects (id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)",
            libsql::params![id.as_str(), name, description, format_datetime(now)],
        )
        .await?;

        tracing::debug!(project_id = %id, "created project");
        Ok(Project {
            id,
            name: name.to_string(),
            description: description.map(String::from),
            created_at: now,
        })
    }

    pub async fn get_project(&self, id: &str) -> Result<Option<Project>, DatabaseError> {
        let sql = format!("SELECT {SELECT_COLS} FROM projects WHERE id = ?1");
        let mut rows = self.query(&sql, [id]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_project(&row)?)),
            None => Ok(None),
        }
    }

    /// List projects, newest first.
    pub async fn list_projects(&self, limit: u32) -> Result<Vec<Project>, DatabaseError> {
        let sql = format!("SELECT {SELECT_COLS} FROM projects ORDER BY created_at DESC LIMIT ?1");
        let mut rows = self.query(&sql, [i64::from(limit)]).await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_project(&row)?);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_db;

    #[tokio::test]
    async fn create_project_roundtrip() {
        let db = test_db().await;
        let project = db
            .create_project("Observability vendors", Some("Q3 landscape"))
            .await
            .unwrap();
        assert!(project.id.starts_with("prj-"));

        let fetched = db.get_project(&project.id).await.unwrap().unwrap();
        assert_eq!(fetched, project);
    }

    #[tokio::test]
    async fn get_unknown_project_is_none() {
        let db = test_db().await;
        assert!(db.get_project("prj-missing0").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_projects_respects_limit() {
        let db = test_db().await;
        for name in ["a", "b", "c"] {
            db.create_project(name, None).await.unwrap();
        }
        assert_eq!(db.list_projects(2).await.unwrap().len(), 2);
        assert_eq!(db.list_projects(10).await.unwrap().len(), 3);
    }
}
