//! The analysis entry point: one bulk store fetch per operation, then pure
//! reduction.

use chrono::{Duration, Utc};
use survey_config::AnalysisConfig;
use survey_core::entities::ExtractionRecord;
use survey_core::enums::{ExtractionStatus, SchemaType};
use survey_core::store::{ExtractionFilter, ExtractionStore};

use crate::diff::{self, DiffOptions, ExtractionDiff};
use crate::error::AnalysisError;
use crate::gaps::{ResearchGapsReport, compute_gaps};
use crate::history::{self, ExtractionHistory, LatestDiffOutcome, RecentChanges};
use crate::query::{self, EntityComparison, FieldValues, GenericQuery, QueryResults};
use crate::views::{
    self, CompanyQuery, CompanyView, ComplianceQuery, ComplianceView, FeaturesQuery,
    FeaturesView, IntegrationsQuery, IntegrationsView, PricingQuery, PricingView,
};

/// Diff, gap, and query operations over an [`ExtractionStore`].
///
/// Unknown projects, entities, and extractions come back as `Ok(None)`.
pub struct Analyst<S> {
    store: S,
    config: AnalysisConfig,
}

impl<S: ExtractionStore> Analyst<S> {
    pub const fn new(store: S, config: AnalysisConfig) -> Self {
        Self { store, config }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn diff_options(&self) -> DiffOptions {
        DiffOptions {
            array_alignment: self.config.array_alignment,
            max_depth: self.config.max_depth,
        }
    }

    async fn fetch(&self, filter: &ExtractionFilter) -> Result<Vec<ExtractionRecord>, AnalysisError> {
        let records = self.store.list_extractions(filter).await?;
        tracing::debug!(
            count = records.len(),
            project_id = filter.project_id.as_deref().unwrap_or("-"),
            entity_id = filter.entity_id.as_deref().unwrap_or("-"),
            "fetched extractions"
        );
        Ok(records)
    }

    async fn project_records(
        &self,
        project_id: &str,
        schema_type: Option<SchemaType>,
    ) -> Result<Vec<ExtractionRecord>, AnalysisError> {
        self.fetch(&ExtractionFilter::completed_in_project(project_id, schema_type))
            .await
    }

    // -----------------------------------------------------------------------
    // Diffs and history
    // -----------------------------------------------------------------------

    /// Diff two extractions by ID.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::SchemaMismatch`] when the two differ in schema type,
    /// plus store and depth errors.
    pub async fn diff_extractions(
        &self,
        old_id: &str,
        new_id: &str,
    ) -> Result<Option<ExtractionDiff>, AnalysisError> {
        let Some(old) = self.store.get_extraction(old_id).await? else {
            return Ok(None);
        };
        let Some(new) = self.store.get_extraction(new_id).await? else {
            return Ok(None);
        };
        diff::diff_extractions(&old, &new, &self.diff_options()).map(Some)
    }

    /// Diff an entity's two newest completed captures of `schema_type`.
    ///
    /// # Errors
    ///
    /// Store and depth errors.
    pub async fn get_latest_diff(
        &self,
        entity_id: &str,
        schema_type: SchemaType,
    ) -> Result<Option<LatestDiffOutcome>, AnalysisError> {
        let Some(entity) = self.store.get_entity(entity_id).await? else {
            return Ok(None);
        };
        let records = self
            .fetch(&ExtractionFilter {
                entity_id: Some(entity.id.clone()),
                schema_type: Some(schema_type),
                status: Some(ExtractionStatus::Completed),
                limit: Some(2),
                ..ExtractionFilter::default()
            })
            .await?;

        let outcome = match records.as_slice() {
            [newest, previous, ..] => LatestDiffOutcome::Diff(diff::diff_extractions(
                previous,
                newest,
                &self.diff_options(),
            )?),
            short => LatestDiffOutcome::insufficient(&entity.name, schema_type, short.len()),
        };
        Ok(Some(outcome))
    }

    /// Capture timeline for one entity, newest first, any status.
    ///
    /// # Errors
    ///
    /// Store errors.
    pub async fn get_extraction_history(
        &self,
        entity_id: &str,
        schema_type: SchemaType,
        limit: Option<u32>,
    ) -> Result<Option<ExtractionHistory>, AnalysisError> {
        let Some(entity) = self.store.get_entity(entity_id).await? else {
            return Ok(None);
        };
        let limit = limit.unwrap_or(self.config.history_limit);
        let records = self
            .fetch(&ExtractionFilter {
                entity_id: Some(entity.id.clone()),
                schema_type: Some(schema_type),
                limit: Some(limit),
                ..ExtractionFilter::default()
            })
            .await?;
        Ok(Some(history::build_history(
            &entity,
            schema_type,
            &records,
            limit as usize,
        )))
    }

    /// Entities whose two newest captures inside the window differ.
    ///
    /// # Errors
    ///
    /// Store and depth errors.
    pub async fn find_recent_changes(
        &self,
        project_id: &str,
        schema_type: Option<SchemaType>,
        days_back: Option<u32>,
    ) -> Result<Option<RecentChanges>, AnalysisError> {
        if self.store.get_project(project_id).await?.is_none() {
            return Ok(None);
        }
        let days = days_back.unwrap_or(self.config.recent_days);
        let filter = ExtractionFilter {
            since: Some(Utc::now() - Duration::days(i64::from(days))),
            ..ExtractionFilter::completed_in_project(project_id, schema_type)
        };
        let records = self.fetch(&filter).await?;
        history::recent_changes(&records, &self.diff_options()).map(Some)
    }

    // -----------------------------------------------------------------------
    // Gaps
    // -----------------------------------------------------------------------

    /// Coverage and priority report for a project.
    ///
    /// # Errors
    ///
    /// Store errors.
    pub async fn get_research_gaps(
        &self,
        project_id: &str,
    ) -> Result<Option<ResearchGapsReport>, AnalysisError> {
        let Some(project) = self.store.get_project(project_id).await? else {
            return Ok(None);
        };
        let entities = self.store.list_entities(project_id).await?;
        tracing::debug!(project_id, entities = entities.len(), "computing research gaps");
        Ok(Some(compute_gaps(
            &project,
            &entities,
            &self.config.schema_types,
        )))
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// # Errors
    ///
    /// Store errors.
    pub async fn query_extractions(
        &self,
        query: &GenericQuery,
    ) -> Result<QueryResults, AnalysisError> {
        let records = self
            .project_records(&query.project_id, query.schema_type)
            .await?;
        let limit = query.limit.unwrap_or(self.config.query_limit as usize);
        Ok(query::query_extractions(&records, query, limit))
    }

    /// # Errors
    ///
    /// Store errors.
    pub async fn get_field_values(
        &self,
        project_id: &str,
        schema_type: SchemaType,
        field_path: &str,
    ) -> Result<FieldValues, AnalysisError> {
        let records = self.project_records(project_id, Some(schema_type)).await?;
        Ok(query::field_values(&records, field_path))
    }

    /// # Errors
    ///
    /// Store errors.
    pub async fn query_pricing(&self, query: &PricingQuery) -> Result<PricingView, AnalysisError> {
        let records = self
            .project_records(&query.project_id, Some(SchemaType::Pricing))
            .await?;
        Ok(views::pricing_view(&records, query))
    }

    /// # Errors
    ///
    /// Store errors.
    pub async fn query_compliance(
        &self,
        query: &ComplianceQuery,
    ) -> Result<ComplianceView, AnalysisError> {
        let records = self
            .project_records(&query.project_id, Some(SchemaType::Compliance))
            .await?;
        Ok(views::compliance_view(&records, query))
    }

    /// # Errors
    ///
    /// Store errors.
    pub async fn query_features(
        &self,
        query: &FeaturesQuery,
    ) -> Result<FeaturesView, AnalysisError> {
        let records = self
            .project_records(&query.project_id, Some(SchemaType::Features))
            .await?;
        Ok(views::features_view(&records, query))
    }

    /// # Errors
    ///
    /// Store errors.
    pub async fn query_integrations(
        &self,
        query: &IntegrationsQuery,
    ) -> Result<IntegrationsView, AnalysisError> {
        let records = self
            .project_records(&query.project_id, Some(SchemaType::Integrations))
            .await?;
        Ok(views::integrations_view(&records, query))
    }

    /// # Errors
    ///
    /// Store errors.
    pub async fn query_companies(&self, query: &CompanyQuery) -> Result<CompanyView, AnalysisError> {
        let records = self
            .project_records(&query.project_id, Some(SchemaType::Company))
            .await?;
        Ok(views::company_view(&records, query))
    }

    /// Side-by-side newest captures for the requested entities, in request order.
    ///
    /// # Errors
    ///
    /// Store errors.
    pub async fn compare_entities(
        &self,
        entity_ids: &[String],
        schema_type: SchemaType,
    ) -> Result<EntityComparison, AnalysisError> {
        let entities = self.store.get_entities(entity_ids).await?;
        if entities.len() < entity_ids.len() {
            tracing::debug!(
                requested = entity_ids.len(),
                found = entities.len(),
                "skipping unknown or repeated entity ids"
            );
        }
        let records = self
            .fetch(&ExtractionFilter {
                entity_ids: Some(entities.iter().map(|entity| entity.id.clone()).collect()),
                schema_type: Some(schema_type),
                status: Some(ExtractionStatus::Completed),
                ..ExtractionFilter::default()
            })
            .await?;
        Ok(query::compare_entities(
            entity_ids,
            &entities,
            &records,
            schema_type,
        ))
    }
}
