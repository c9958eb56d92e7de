//! Shared test utilities for survey-db unit tests.

use survey_core::entities::Entity;

use crate::SurveyDb;

/// Open an empty in-memory database.
pub async fn test_db() -> SurveyDb {
    SurveyDb::open_local(":memory:").await.unwrap()
}

/// Create a fresh project holding one entity and return the entity.
pub async fn seed_entity(db: &SurveyDb, name: &str, url: Option<&str>) -> Entity {
    let project = db.create_project("test project", None).await.unwrap();
    db.create_entity(&project.id, name, Some("company"), url)
        .await
        .unwrap()
}
