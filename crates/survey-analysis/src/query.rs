//! Generic cross-entity queries over opaque payloads.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use survey_core::entities::{Entity, ExtractionRecord};
use survey_core::enums::SchemaType;

use crate::history::{latest_per_entity, latest_per_entity_schema};
use crate::value::{Predicate, get_nested_value, search_in_object, values_equal};

/// Entity type bucket for entities without one.
pub const UNKNOWN_ENTITY_TYPE: &str = "unknown";

/// One `path → expected` condition. See [`Predicate`] for the operator forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldFilter {
    pub path: String,
    pub expected: Value,
}

impl FieldFilter {
    #[must_use]
    pub fn new(path: impl Into<String>, expected: Value) -> Self {
        Self {
            path: path.into(),
            expected,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GenericQuery {
    pub project_id: String,
    pub schema_type: Option<SchemaType>,
    /// All must pass, checked in order.
    #[serde(default)]
    pub filters: Vec<FieldFilter>,
    pub search_text: Option<String>,
    /// Falls back to the configured query limit.
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QueryMatch {
    pub entity_id: String,
    pub entity_name: String,
    pub entity_type: Option<String>,
    pub entity_url: Option<String>,
    pub schema_type: SchemaType,
    pub data: Value,
    pub extracted_at: DateTime<Utc>,
    pub source_url: String,
    /// Paths that matched the search text; absent without a search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_fields: Option<Vec<String>>,
}

impl QueryMatch {
    fn new(record: &ExtractionRecord, matched_fields: Option<Vec<String>>) -> Self {
        Self {
            entity_id: record.entity_id.clone(),
            entity_name: record.entity_name.clone(),
            entity_type: record.entity_type.clone(),
            entity_url: record.entity_url.clone(),
            schema_type: record.schema_type,
            data: record.data.clone(),
            extracted_at: record.extracted_at,
            source_url: record.source_url.clone(),
            matched_fields,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QuerySummary {
    pub total_results: usize,
    pub by_schema_type: BTreeMap<String, usize>,
    pub by_entity_type: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QueryResults {
    pub results: Vec<QueryMatch>,
    pub summary: QuerySummary,
}

/// Run a generic query over completed records, newest capture per
/// `(entity, schema type)` only.
#[must_use]
pub fn query_extractions(
    records: &[ExtractionRecord],
    query: &GenericQuery,
    limit: usize,
) -> QueryResults {
    let predicates: Vec<(&str, Predicate)> = query
        .filters
        .iter()
        .map(|filter| (filter.path.as_str(), Predicate::parse(&filter.expected)))
        .collect();

    let mut results = Vec::new();
    for record in latest_per_entity_schema(records) {
        if results.len() >= limit {
            break;
        }
        if query
            .schema_type
            .is_some_and(|schema| schema != record.schema_type)
        {
            continue;
        }

        let matched_fields = match query.search_text.as_deref() {
            Some(text) => {
                let paths = search_in_object(&record.data, text);
                if paths.is_empty() {
                    continue;
                }
                Some(paths)
            }
            None => None,
        };

        let passes = predicates
            .iter()
            .all(|(path, predicate)| predicate.matches(get_nested_value(Some(&record.data), path)));
        if passes {
            results.push(QueryMatch::new(&record, matched_fields));
        }
    }

    let mut summary = QuerySummary {
        total_results: results.len(),
        ..QuerySummary::default()
    };
    for hit in &results {
        *summary
            .by_schema_type
            .entry(hit.schema_type.to_string())
            .or_default() += 1;
        let entity_type = hit.entity_type.as_deref().unwrap_or(UNKNOWN_ENTITY_TYPE);
        *summary
            .by_entity_type
            .entry(entity_type.to_string())
            .or_default() += 1;
    }

    QueryResults { results, summary }
}

// ---------------------------------------------------------------------------
// Field values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldValueCount {
    pub value: Value,
    pub count: usize,
    /// Names of the entities reporting this value.
    pub entities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldValues {
    pub values: Vec<FieldValueCount>,
    pub total_entities: usize,
}

/// Distinct values at `field_path` across each entity's newest capture.
///
/// Array values contribute each element. Entities without the field still
/// count toward `total_entities`.
#[must_use]
pub fn field_values(records: &[ExtractionRecord], field_path: &str) -> FieldValues {
    let latest = latest_per_entity(records);
    let mut values: Vec<FieldValueCount> = Vec::new();

    for record in &latest {
        let Some(found) = get_nested_value(Some(&record.data), field_path) else {
            continue;
        };
        let items = match found {
            Value::Array(items) => items.as_slice(),
            single => std::slice::from_ref(single),
        };
        for item in items {
            match values.iter_mut().find(|entry| values_equal(&entry.value, item)) {
                Some(entry) => {
                    entry.count += 1;
                    entry.entities.push(record.entity_name.clone());
                }
                None => values.push(FieldValueCount {
                    value: item.clone(),
                    count: 1,
                    entities: vec![record.entity_name.clone()],
                }),
            }
        }
    }
    values.sort_by(|a, b| b.count.cmp(&a.count));

    FieldValues {
        values,
        total_entities: latest.len(),
    }
}

// ---------------------------------------------------------------------------
// Side-by-side comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComparedEntity {
    pub entity_id: String,
    pub entity_name: String,
    pub entity_url: Option<String>,
    pub has_data: bool,
    /// `null` when the entity has no capture of the schema type.
    pub data: Value,
    pub extracted_at: Option<DateTime<Utc>>,
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EntityComparison {
    pub schema_type: SchemaType,
    pub entities: Vec<ComparedEntity>,
}

/// Pair each requested entity with its newest capture of `schema_type`.
///
/// Output follows `requested`; IDs missing from `entities` and repeated IDs
/// are skipped.
#[must_use]
pub fn compare_entities(
    requested: &[String],
    entities: &[Entity],
    records: &[ExtractionRecord],
    schema_type: SchemaType,
) -> EntityComparison {
    let candidates: Vec<ExtractionRecord> = records
        .iter()
        .filter(|record| record.schema_type == schema_type && record.is_completed())
        .cloned()
        .collect();
    let latest = latest_per_entity(&candidates);

    let mut seen: Vec<&str> = Vec::new();
    let mut compared = Vec::new();
    for id in requested {
        if seen.contains(&id.as_str()) {
            continue;
        }
        let Some(entity) = entities.iter().find(|entity| entity.id == *id) else {
            continue;
        };
        seen.push(id.as_str());

        let capture = latest.iter().find(|record| record.entity_id == entity.id);
        compared.push(ComparedEntity {
            entity_id: entity.id.clone(),
            entity_name: entity.name.clone(),
            entity_url: entity.url.clone(),
            has_data: capture.is_some(),
            data: capture.map_or(Value::Null, |record| record.data.clone()),
            extracted_at: capture.map(|record| record.extracted_at),
            source_url: capture.map(|record| record.source_url.clone()),
        });
    }

    EntityComparison {
        schema_type,
        entities: compared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use survey_core::enums::ExtractionStatus;

    fn record(
        entity: &str,
        entity_type: Option<&str>,
        schema: SchemaType,
        hours_ago: i64,
        data: Value,
    ) -> ExtractionRecord {
        ExtractionRecord {
            id: format!("ext-{entity}-{schema}-{hours_ago}"),
            entity_id: format!("ent-{entity}"),
            entity_name: entity.into(),
            entity_url: Some(format!("https://{entity}.example")),
            entity_type: entity_type.map(str::to_string),
            schema_type: schema,
            data,
            extracted_at: Utc::now() - Duration::hours(hours_ago),
            status: ExtractionStatus::Completed,
            source_id: "src".into(),
            source_url: format!("https://{entity}.example/pricing"),
            confidence: None,
            screenshot_path: None,
        }
    }

    fn sample() -> Vec<ExtractionRecord> {
        vec![
            record("Acme", Some("product"), SchemaType::Pricing, 1, json!({"currency": "USD", "seats": 10, "regions": ["eu", "us"]})),
            record("Acme", Some("product"), SchemaType::Pricing, 5, json!({"currency": "EUR", "seats": 50})),
            record("Beta", None, SchemaType::Pricing, 2, json!({"currency": "USD", "seats": 3, "regions": ["us"]})),
            record("Gamma", Some("product"), SchemaType::Company, 3, json!({"name": "Gamma Cloud Inc"})),
        ]
    }

    #[test]
    fn filters_apply_to_latest_capture_only() {
        let query = GenericQuery {
            project_id: "proj-1".into(),
            filters: vec![FieldFilter::new("seats", json!(">5"))],
            ..GenericQuery::default()
        };
        let found = query_extractions(&sample(), &query, 100);
        let names: Vec<&str> = found.results.iter().map(|r| r.entity_name.as_str()).collect();
        assert_eq!(names, vec!["Acme"]);
        assert_eq!(found.results[0].data["seats"], json!(10));
        assert!(found.results[0].matched_fields.is_none());
    }

    #[test]
    fn search_text_attaches_matched_paths() {
        let query = GenericQuery {
            project_id: "proj-1".into(),
            search_text: Some("US".into()),
            ..GenericQuery::default()
        };
        let found = query_extractions(&sample(), &query, 100);
        assert_eq!(found.summary.total_results, 2);
        assert_eq!(
            found.results[0].matched_fields,
            Some(vec!["currency".to_string(), "regions[1]".to_string()])
        );
        assert_eq!(found.summary.by_entity_type.get("unknown"), Some(&1));
        assert_eq!(found.summary.by_schema_type.get("pricing"), Some(&2));
    }

    #[test]
    fn every_filter_must_pass_and_limit_caps() {
        let query = GenericQuery {
            project_id: "proj-1".into(),
            filters: vec![
                FieldFilter::new("currency", json!("USD")),
                FieldFilter::new("regions", json!("contains:eu")),
            ],
            ..GenericQuery::default()
        };
        assert_eq!(query_extractions(&sample(), &query, 100).results.len(), 1);

        let open = GenericQuery {
            project_id: "proj-1".into(),
            ..GenericQuery::default()
        };
        let capped = query_extractions(&sample(), &open, 2);
        assert_eq!(capped.results.len(), 2);
        assert_eq!(capped.summary.total_results, 2);
    }

    #[test]
    fn schema_type_narrows_candidates() {
        let query = GenericQuery {
            project_id: "proj-1".into(),
            schema_type: Some(SchemaType::Company),
            search_text: Some("cloud".into()),
            ..GenericQuery::default()
        };
        let found = query_extractions(&sample(), &query, 100);
        assert_eq!(found.results.len(), 1);
        assert_eq!(found.results[0].entity_name, "Gamma");
    }

    #[test]
    fn field_values_count_array_elements() {
        let pricing: Vec<ExtractionRecord> = sample()
            .into_iter()
            .filter(|r| r.schema_type == SchemaType::Pricing)
            .collect();

        let regions = field_values(&pricing, "regions");
        assert_eq!(regions.total_entities, 2);
        assert_eq!(regions.values[0].value, json!("us"));
        assert_eq!(regions.values[0].count, 2);
        assert_eq!(regions.values[0].entities, vec!["Acme", "Beta"]);
        assert_eq!(regions.values[1].value, json!("eu"));

        let missing = field_values(&pricing, "nothing.here");
        assert!(missing.values.is_empty());
        assert_eq!(missing.total_entities, 2);
    }

    #[test]
    fn comparison_follows_request_order() {
        let entity = |name: &str| Entity {
            id: format!("ent-{name}"),
            project_id: "proj-1".into(),
            name: name.into(),
            entity_type: None,
            url: None,
            created_at: Utc::now(),
        };
        let entities = vec![entity("Acme"), entity("Beta"), entity("Gamma")];
        let requested: Vec<String> = ["ent-Gamma", "ent-Acme", "ent-nope", "ent-Acme"]
            .into_iter()
            .map(String::from)
            .collect();

        let comparison = compare_entities(&requested, &entities, &sample(), SchemaType::Pricing);
        assert_eq!(comparison.entities.len(), 2);
        assert_eq!(comparison.entities[0].entity_name, "Gamma");
        assert!(!comparison.entities[0].has_data);
        assert_eq!(comparison.entities[0].data, Value::Null);
        assert_eq!(comparison.entities[1].data["currency"], json!("USD"));
    }
}
