//! Source repository. A source is a URL an entity's data was captured from.

use chrono::Utc;
use survey_core::ids::PREFIX_SOURCE;

use crate::SurveyDb;
use crate::error::DatabaseError;
use crate::helpers::format_datetime;

impl SurveyDb {
    /// Return the ID of the entity's source at `url`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the lookup or INSERT fails.
    pub async fn ensure_source(&self, entity_id: &str, url: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .query(
                "SELECT id FROM sources WHERE entity_id = ?1 AND url = ?2",
                libsql::params![entity_id, url],
            )
            .await?;
        if let Some(row) = rows.next().await? {
            return Ok(row.get::<String>(0)?);
        }

        let id = self.generate_id(PREFIX_SOURCE).await?;
        self.execute(
            "INSERT INTO sources (id, entity_id, url, created_at) VALUES (?1, ?2, ?3, ?4)",
            libsql::params![id.as_str(), entity_id, url, format_datetime(Utc::now())],
        )
        .await?;
        Ok(id)
    }
}
