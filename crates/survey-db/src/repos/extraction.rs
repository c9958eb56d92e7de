//! Extraction repository: ingest and filtered listing.

use chrono::{DateTime, Utc};
use serde_json::Value;
use survey_core::entities::ExtractionRecord;
use survey_core::enums::{ExtractionStatus, SchemaType};
use survey_core::ids::PREFIX_EXTRACTION;
use survey_core::store::ExtractionFilter;

use crate::SurveyDb;
use crate::error::DatabaseError;
use crate::helpers::{
    format_datetime, get_opt_string, parse_datetime, parse_enum, parse_json, placeholders,
};

/// Extraction joined with its entity and source, in `row_to_record` column order.
const SELECT_JOINED: &str = "SELECT x.id, x.entity_id, e.name, e.url, e.entity_type,
        x.schema_type, x.data, x.extracted_at, x.status, x.source_id, s.url,
        x.confidence, x.screenshot_path
     FROM extractions x
     JOIN entities e ON e.id = x.entity_id
     JOIN sources s ON s.id = x.source_id";

fn row_to_record(row: &libsql::Row) -> Result<ExtractionRecord, DatabaseError> {
    Ok(ExtractionRecord {
        id: row.get::<String>(0)?,
        entity_id: row.get::<String>(1)?,
        entity_name: row.get::<String>(2)?,
        entity_url: get_opt_string(row, 3)?,
        entity_type: get_opt_string(row, 4)?,
        schema_type: parse_enum(&row.get::<String>(5)?)?,
        data: parse_json(&row.get::<String>(6)?)?,
        extracted_at: parse_datetime(&row.get::<String>(7)?)?,
        status: parse_enum(&row.get::<String>(8)?)?,
        source_id: row.get::<String>(9)?,
        source_url: row.get::<String>(10)?,
        confidence: row.get::<Option<f64>>(11)?,
        screenshot_path: get_opt_string(row, 12)?,
    })
}

/// A capture to ingest.
#[derive(Debug, Clone)]
pub struct NewExtraction {
    pub entity_id: String,
    pub schema_type: SchemaType,
    pub data: Value,
    /// Page the data came from; defaults to the entity's URL.
    pub source_url: Option<String>,
    pub status: ExtractionStatus,
    pub confidence: Option<f64>,
    pub screenshot_path: Option<String>,
    /// Capture time; defaults to now.
    pub extracted_at: Option<DateTime<Utc>>,
}

impl NewExtraction {
    /// A completed capture with no source override, confidence, or screenshot.
    #[must_use]
    pub const fn completed(entity_id: String, schema_type: SchemaType, data: Value) -> Self {
        Self {
            entity_id,
            schema_type,
            data,
            source_url: None,
            status: ExtractionStatus::Completed,
            confidence: None,
            screenshot_path: None,
            extracted_at: None,
        }
    }
}

impl SurveyDb {
    /// Store an extraction, creating its source row when needed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown entity and
    /// `DatabaseError::InvalidState` when no source URL can be determined or the
    /// confidence is outside `0..=1`.
    pub async fn create_extraction(
        &self,
        new: NewExtraction,
    ) -> Result<ExtractionRecord, DatabaseError> {
        let entity = self
            .get_entity(&new.entity_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound {
                entity_type: "entity".into(),
                id: new.entity_id.clone(),
            })?;

        if let Some(confidence) = new.confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(DatabaseError::InvalidState(format!(
                    "confidence {confidence} is outside 0..=1"
                )));
            }
        }

        let source_url = new
            .source_url
            .or_else(|| entity.url.clone())
            .ok_or_else(|| {
                DatabaseError::InvalidState(format!(
                    "entity {} has no URL; a source URL is required",
                    entity.id
                ))
            })?;
        let source_id = self.ensure_source(&entity.id, &source_url).await?;

        let id = self.generate_id(PREFIX_EXTRACTION).await?;
        let extracted_at = new.extracted_at.unwrap_or_else(Utc::now);
        let data = serde_json::to_string(&new.data).map_err(|e| DatabaseError::Other(e.into()))?;

        self.execute(
            "INSERT INTO extractions
               (id, entity_id, source_id, schema_type, data, status, confidence, screenshot_path, extracted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            libsql::params![
                id.as_str(),
                entity.id.as_str(),
                source_id.as_str(),
                new.schema_type.as_str(),
                data,
                new.status.as_str(),
                new.confidence,
                new.screenshot_path.as_deref(),
                format_datetime(extracted_at)
            ],
        )
        .await?;

        tracing::debug!(extraction_id = %id, entity_id = %entity.id, schema = %new.schema_type, "stored extraction");
        self.get_extraction(&id).await?.ok_or(DatabaseError::NoResult)
    }

    pub async fn get_extraction(&self, id: &str) -> Result<Option<ExtractionRecord>, DatabaseError> {
        let sql = format!("{SELECT_JOINED} WHERE x.id = ?1");
        let mut rows = self.query(&sql, [id]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    /// List extractions matching `filter`, most recently captured first.
    pub async fn list_extractions(
        &self,
        filter: &ExtractionFilter,
    ) -> Result<Vec<ExtractionRecord>, DatabaseError> {
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref entity_id) = filter.entity_id {
            params.push(entity_id.as_str().into());
            clauses.push(format!("x.entity_id = ?{}", params.len()));
        }
        if let Some(ref ids) = filter.entity_ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let start = params.len() + 1;
            params.extend(ids.iter().map(|id| libsql::Value::from(id.as_str())));
            clauses.push(format!("x.entity_id IN ({})", placeholders(start, ids.len())));
        }
        if let Some(ref project_id) = filter.project_id {
            params.push(project_id.as_str().into());
            clauses.push(format!("e.project_id = ?{}", params.len()));
        }
        if let Some(schema) = filter.schema_type {
            params.push(schema.as_str().into());
            clauses.push(format!("x.schema_type = ?{}", params.len()));
        }
        if let Some(status) = filter.status {
            params.push(status.as_str().into());
            clauses.push(format!("x.status = ?{}", params.len()));
        }
        if let Some(since) = filter.since {
            params.push(format_datetime(since).into());
            clauses.push(format!("x.extracted_at >= ?{}", params.len()));
        }

        let mut sql = SELECT_JOINED.to_string();
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY x.extracted_at DESC, x.rowid DESC");
        if let Some(limit) = filter.limit {
            params.push(i64::from(limit).into());
            sql.push_str(&format!(" LIMIT ?{}", params.len()));
        }

        let mut rows = self.query(&sql, libsql::params_from_iter(params)).await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_record(&row)?);
        }
        tracing::debug!(count = results.len(), "listed extractions");
        Ok(results)
    }

    /// `(entity_id, schema_type)` of every completed extraction in a project,
    /// oldest first.
    pub async fn completed_schema_pairs(
        &self,
        project_id: &str,
    ) -> Result<Vec<(String, SchemaType)>, DatabaseError> {
        let mut rows = self
            .query(
                "SELECT x.entity_id, x.schema_type
                 FROM extractions x JOIN entities e ON e.id = x.entity_id
                 WHERE e.project_id = ?1 AND x.status = 'completed'
                 ORDER BY x.extracted_at, x.rowid",
                [project_id],
            )
            .await?;
        let mut pairs = Vec::new();
        while let Some(row) = rows.next().await? {
            pairs.push((row.get::<String>(0)?, parse_enum(&row.get::<String>(1)?)?));
        }
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use survey_core::enums::{ExtractionStatus, SchemaType};
    use survey_core::store::ExtractionFilter;

    use super::NewExtraction;
    use crate::error::DatabaseError;
    use crate::test_support::{seed_entity, test_db};

    fn at(day: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn create_extraction_roundtrip() {
        let db = test_db().await;
        let entity = seed_entity(&db, "Acme", Some("https://acme.example")).await;

        let mut new = NewExtraction::completed(
            entity.id.clone(),
            SchemaType::Pricing,
            json!({"hasFreeTier": true, "tiers": [{"name": "Pro", "price": 29}]}),
        );
        new.confidence = Some(0.8);
        new.extracted_at = Some(at(2));
        let record = db.create_extraction(new).await.unwrap();

        assert!(record.id.starts_with("ext-"));
        assert_eq!(record.entity_name, "Acme");
        assert_eq!(record.source_url, "https://acme.example");
        assert_eq!(record.extracted_at, at(2));
        assert_eq!(record.confidence, Some(0.8));
        assert_eq!(record.data["tiers"][0]["price"], 29);
        assert_eq!(db.get_extraction(&record.id).await.unwrap().unwrap(), record);
    }

    #[tokio::test]
    async fn payload_key_order_survives_storage() {
        let db = test_db().await;
        let entity = seed_entity(&db, "Acme", Some("https://acme.example")).await;
        let data = json!({"zeta": 1, "alpha": 2, "mid": 3});

        let record = db
            .create_extraction(NewExtraction::completed(entity.id, SchemaType::Company, data))
            .await
            .unwrap();
        let keys: Vec<&String> = record.data.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[tokio::test]
    async fn create_extraction_requires_some_source_url() {
        let db = test_db().await;
        let entity = seed_entity(&db, "NoUrl", None).await;

        let err = db
            .create_extraction(NewExtraction::completed(entity.id, SchemaType::Company, json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidState(_)));
    }

    #[tokio::test]
    async fn create_extraction_rejects_bad_confidence() {
        let db = test_db().await;
        let entity = seed_entity(&db, "Acme", Some("https://acme.example")).await;
        let mut new = NewExtraction::completed(entity.id, SchemaType::Company, json!({}));
        new.confidence = Some(1.5);

        assert!(db.create_extraction(new).await.is_err());
    }

    #[tokio::test]
    async fn list_extractions_filters_and_orders() {
        let db = test_db().await;
        let acme = seed_entity(&db, "Acme", Some("https://acme.example")).await;

        for (day, schema, status) in [
            (1, SchemaType::Pricing, ExtractionStatus::Completed),
            (3, SchemaType::Pricing, ExtractionStatus::Completed),
            (2, SchemaType::Company, ExtractionStatus::Completed),
            (4, SchemaType::Pricing, ExtractionStatus::Failed),
        ] {
            let mut new = NewExtraction::completed(acme.id.clone(), schema, json!({"day": day}));
            new.status = status;
            new.extracted_at = Some(at(day));
            db.create_extraction(new).await.unwrap();
        }

        let filter = ExtractionFilter {
            entity_id: Some(acme.id.clone()),
            schema_type: Some(SchemaType::Pricing),
            status: Some(ExtractionStatus::Completed),
            ..ExtractionFilter::default()
        };
        let days: Vec<i64> = db
            .list_extractions(&filter)
            .await
            .unwrap()
            .iter()
            .map(|r| r.data["day"].as_i64().unwrap())
            .collect();
        assert_eq!(days, vec![3, 1]);

        let since = ExtractionFilter {
            project_id: Some(acme.project_id.clone()),
            since: Some(at(2)),
            limit: Some(2),
            ..ExtractionFilter::default()
        };
        let days: Vec<i64> = db
            .list_extractions(&since)
            .await
            .unwrap()
            .iter()
            .map(|r| r.data["day"].as_i64().unwrap())
            .collect();
        assert_eq!(days, vec![4, 3]);

        let none = ExtractionFilter {
            entity_ids: Some(vec![]),
            ..ExtractionFilter::default()
        };
        assert!(db.list_extractions(&none).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn completed_schema_pairs_skip_failed() {
        let db = test_db().await;
        let acme = seed_entity(&db, "Acme", Some("https://acme.example")).await;
        let mut failed = NewExtraction::completed(acme.id.clone(), SchemaType::Features, json!({}));
        failed.status = ExtractionStatus::Failed;
        db.create_extraction(failed).await.unwrap();
        let mut done = NewExtraction::completed(acme.id.clone(), SchemaType::Pricing, json!({}));
        done.extracted_at = Some(Utc::now() - Duration::days(1));
        db.create_extraction(done).await.unwrap();

        let pairs = db.completed_schema_pairs(&acme.project_id).await.unwrap();
        assert_eq!(pairs, vec![(acme.id, SchemaType::Pricing)]);
    }
}
