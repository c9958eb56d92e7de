//! End-to-end analyst operations over the in-memory store.

use chrono::{DateTime, Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use survey_analysis::diff::ChangeType;
use survey_analysis::history::LatestDiffOutcome;
use survey_analysis::query::{FieldFilter, GenericQuery};
use survey_analysis::views::{PricingQuery, PricingSort};
use survey_analysis::{AnalysisError, Analyst};
use survey_config::AnalysisConfig;
use survey_core::entities::{Entity, ExtractionRecord, Project};
use survey_core::enums::{ArrayAlignment, ExtractionStatus, Priority, SchemaType};
use survey_core::store::MemoryStore;

const PROJECT: &str = "prj-00000001";

fn now() -> DateTime<Utc> {
    Utc::now()
}

struct Fixture {
    store: MemoryStore,
    seq: usize,
}

impl Fixture {
    fn new() -> Self {
        let mut store = MemoryStore::new();
        store.insert_project(Project {
            id: PROJECT.into(),
            name: "Code assistants".into(),
            description: None,
            created_at: now(),
        });
        Self { store, seq: 0 }
    }

    fn entity(&mut self, name: &str, url: Option<&str>) -> String {
        let id = format!("ent-{}", name.to_lowercase());
        self.store.insert_entity(Entity {
            id: id.clone(),
            project_id: PROJECT.into(),
            name: name.into(),
            entity_type: Some("product".into()),
            url: url.map(str::to_string),
            created_at: now(),
        });
        id
    }

    fn capture(&mut self, entity_id: &str, schema: SchemaType, days_ago: i64, data: Value) -> String {
        self.capture_with(entity_id, schema, days_ago, data, ExtractionStatus::Completed)
    }

    fn capture_with(
        &mut self,
        entity_id: &str,
        schema: SchemaType,
        days_ago: i64,
        data: Value,
        status: ExtractionStatus,
    ) -> String {
        self.seq += 1;
        let id = format!("ext-{:08}", self.seq);
        self.store.insert_extraction(ExtractionRecord {
            id: id.clone(),
            entity_id: entity_id.into(),
            entity_name: entity_id.trim_start_matches("ent-").into(),
            entity_url: None,
            entity_type: Some("product".into()),
            schema_type: schema,
            data,
            extracted_at: now() - Duration::days(days_ago),
            status,
            source_id: "src-1".into(),
            source_url: "https://example.com/pricing".into(),
            confidence: Some(0.8),
            screenshot_path: None,
        });
        id
    }

    fn analyst(self) -> Analyst<MemoryStore> {
        Analyst::new(self.store, AnalysisConfig::default())
    }
}

fn pricing(has_free: bool, tiers: Value) -> Value {
    json!({"currency": "USD", "hasFreeTier": has_free, "tiers": tiers})
}

#[tokio::test]
async fn latest_diff_reports_tier_addition_and_flag_flip() {
    let mut fx = Fixture::new();
    let acme = fx.entity("Acme", Some("https://acme.example"));
    fx.capture(&acme, SchemaType::Pricing, 10, pricing(true, json!([{"name": "Free", "price": 0}])));
    fx.capture(
        &acme,
        SchemaType::Pricing,
        1,
        pricing(false, json!([{"name": "Free", "price": 0}, {"name": "Pro", "price": 29}])),
    );
    let analyst = fx.analyst();

    let Some(LatestDiffOutcome::Diff(diff)) =
        analyst.get_latest_diff(&acme, SchemaType::Pricing).await.unwrap()
    else {
        panic!("expected a diff");
    };
    let changes: Vec<(&str, ChangeType)> = diff
        .changes
        .iter()
        .map(|c| (c.path.as_str(), c.change_type))
        .collect();
    assert_eq!(
        changes,
        vec![("hasFreeTier", ChangeType::Changed), ("tiers[1]", ChangeType::Added)]
    );
    assert_eq!(diff.days_between, 9);
    assert_eq!(diff.summary.total, 2);
}

#[tokio::test]
async fn latest_diff_with_too_few_captures_is_not_an_error() {
    let mut fx = Fixture::new();
    let acme = fx.entity("Acme", Some("https://acme.example"));
    fx.capture(&acme, SchemaType::Pricing, 1, json!({}));
    fx.capture_with(&acme, SchemaType::Pricing, 2, json!({}), ExtractionStatus::Failed);
    let analyst = fx.analyst();

    match analyst.get_latest_diff(&acme, SchemaType::Pricing).await.unwrap() {
        Some(LatestDiffOutcome::Insufficient { extraction_count, .. }) => {
            assert_eq!(extraction_count, 1);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    match analyst.get_latest_diff(&acme, SchemaType::Company).await.unwrap() {
        Some(LatestDiffOutcome::Insufficient { message, extraction_count }) => {
            assert_eq!(extraction_count, 0);
            assert_eq!(message, "No company extractions found for Acme");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(analyst.get_latest_diff("ent-missing", SchemaType::Pricing).await.unwrap().is_none());
}

#[tokio::test]
async fn diffing_across_schema_types_fails() {
    let mut fx = Fixture::new();
    let acme = fx.entity("Acme", None);
    let pricing_id = fx.capture(&acme, SchemaType::Pricing, 2, json!({}));
    let company_id = fx.capture(&acme, SchemaType::Company, 1, json!({}));
    let analyst = fx.analyst();

    let err = analyst.diff_extractions(&pricing_id, &company_id).await.unwrap_err();
    assert!(matches!(err, AnalysisError::SchemaMismatch { .. }));
    assert!(analyst.diff_extractions(&pricing_id, "ext-missing").await.unwrap().is_none());
}

#[tokio::test]
async fn history_includes_failed_captures() {
    let mut fx = Fixture::new();
    let acme = fx.entity("Acme", None);
    fx.capture(&acme, SchemaType::Pricing, 4, json!({"v": 1}));
    fx.capture_with(&acme, SchemaType::Pricing, 2, json!({}), ExtractionStatus::Failed);
    fx.capture(&acme, SchemaType::Pricing, 0, json!({"v": 2}));
    let analyst = fx.analyst();

    let history = analyst
        .get_extraction_history(&acme, SchemaType::Pricing, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(history.total_extractions, 3);
    assert_eq!(history.extractions[1].status, ExtractionStatus::Failed);
    assert_eq!(history.average_days_between, Some(2.0));

    let limited = analyst
        .get_extraction_history(&acme, SchemaType::Pricing, Some(2))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(limited.total_extractions, 2);
}

#[tokio::test]
async fn gaps_rank_entities_and_compute_coverage() {
    let mut fx = Fixture::new();
    let acme = fx.entity("Acme", Some("https://acme.example"));
    fx.entity("Beta", Some("https://beta.example"));
    fx.entity("Gamma", None);
    fx.entity("Delta", Some("https://delta.example"));
    fx.capture(&acme, SchemaType::Pricing, 1, json!({}));
    fx.capture_with(&acme, SchemaType::Company, 1, json!({}), ExtractionStatus::Failed);
    let analyst = fx.analyst();

    let report = analyst.get_research_gaps(PROJECT).await.unwrap().unwrap();
    assert_eq!(report.coverage_by_schema[0].coverage_percent, 25);
    assert_eq!(report.entity_gaps[0].priority, Priority::High);
    let gamma = report
        .entity_gaps
        .iter()
        .find(|gap| gap.name == "Gamma")
        .unwrap();
    assert_eq!(gamma.priority, Priority::Low);
    let acme_gap = report.entity_gaps.iter().find(|gap| gap.name == "Acme").unwrap();
    assert_eq!(acme_gap.existing_schemas, vec![SchemaType::Pricing]);

    assert!(analyst.get_research_gaps("prj-missing").await.unwrap().is_none());
}

#[tokio::test]
async fn pricing_view_uses_newest_capture_only() {
    let mut fx = Fixture::new();
    let acme = fx.entity("Acme", None);
    let beta = fx.entity("Beta", None);
    fx.capture(&acme, SchemaType::Pricing, 30, pricing(false, json!([{"name": "Pro", "price": 10}])));
    fx.capture(&acme, SchemaType::Pricing, 20, pricing(false, json!([{"name": "Pro", "price": 20}])));
    fx.capture(&acme, SchemaType::Pricing, 10, pricing(false, json!([{"name": "Pro", "price": 30}])));
    fx.capture(&beta, SchemaType::Pricing, 5, pricing(true, json!([{"name": "Team", "price": null}])));
    let analyst = fx.analyst();

    let view = analyst
        .query_pricing(&PricingQuery {
            project_id: PROJECT.into(),
            sort_by: PricingSort::PriceAsc,
            ..PricingQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(view.results.len(), 2);
    assert_eq!(view.results[0].lowest_paid_price, Some(30.0));
    assert_eq!(view.results[1].source.entity_name, "beta");
    assert_eq!(view.summary.with_free_tier, 1);
}

#[tokio::test]
async fn generic_query_and_field_values() {
    let mut fx = Fixture::new();
    let acme = fx.entity("Acme", None);
    let beta = fx.entity("Beta", None);
    fx.capture(&acme, SchemaType::Company, 1, json!({"headquarters": "Berlin", "employees": 120}));
    fx.capture(&beta, SchemaType::Company, 1, json!({"headquarters": "Austin", "employees": 15}));
    let analyst = fx.analyst();

    let found = analyst
        .query_extractions(&GenericQuery {
            project_id: PROJECT.into(),
            filters: vec![FieldFilter::new("employees", json!(">=100"))],
            ..GenericQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(found.summary.total_results, 1);
    assert_eq!(found.results[0].entity_id, acme);

    let values = analyst
        .get_field_values(PROJECT, SchemaType::Company, "headquarters")
        .await
        .unwrap();
    assert_eq!(values.total_entities, 2);
    assert_eq!(values.values.len(), 2);
}

#[tokio::test]
async fn comparison_keeps_request_order_and_marks_missing_data() {
    let mut fx = Fixture::new();
    let acme = fx.entity("Acme", None);
    let beta = fx.entity("Beta", None);
    fx.capture(&acme, SchemaType::Features, 1, json!({"highlights": ["fast"]}));
    let analyst = fx.analyst();

    let comparison = analyst
        .compare_entities(&[beta.clone(), acme.clone(), "ent-nope".into()], SchemaType::Features)
        .await
        .unwrap();
    assert_eq!(comparison.entities.len(), 2);
    assert_eq!(comparison.entities[0].entity_id, beta);
    assert!(!comparison.entities[0].has_data);
    assert!(comparison.entities[1].has_data);
}

#[tokio::test]
async fn recent_changes_respect_window_and_alignment() {
    let mut fx = Fixture::new();
    let acme = fx.entity("Acme", None);
    let old = json!({"tiers": [{"name": "Free", "price": 0}, {"name": "Pro", "price": 20}]});
    let new = json!({"tiers": [{"name": "Starter", "price": 5}, {"name": "Free", "price": 0}, {"name": "Pro", "price": 20}]});
    fx.capture(&acme, SchemaType::Pricing, 60, json!({"tiers": []}));
    fx.capture(&acme, SchemaType::Pricing, 5, old);
    fx.capture(&acme, SchemaType::Pricing, 1, new);

    let config = AnalysisConfig {
        array_alignment: ArrayAlignment::Keyed,
        ..AnalysisConfig::default()
    };
    let keyed = Analyst::new(fx.store.clone(), config);
    let report = keyed.find_recent_changes(PROJECT, None, None).await.unwrap().unwrap();
    assert_eq!(report.summary.entities_checked, 1);
    assert_eq!(report.entities_with_changes[0].change_count, 1);

    let indexed = fx.analyst();
    let report = indexed.find_recent_changes(PROJECT, None, None).await.unwrap().unwrap();
    assert!(report.entities_with_changes[0].change_count > 1);

    let narrow = indexed
        .find_recent_changes(PROJECT, Some(SchemaType::Pricing), Some(3))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(narrow.summary.entities_with_changes, 0);
    assert!(indexed.find_recent_changes("prj-missing", None, None).await.unwrap().is_none());
}
