//! Schema-specialized views: newest capture per entity, parsed into a typed
//! record, filtered, sorted, and summarized.

mod company;
mod compliance;
mod features;
mod integrations;
mod pricing;

pub use company::{CompanyQuery, CompanyResult, CompanySummary, CompanyView, YearRange, company_view};
pub use compliance::{
    ComplianceQuery, ComplianceResult, ComplianceSummary, ComplianceView, compliance_view,
};
pub use features::{
    CategorySummary, FeatureResult, FeaturesQuery, FeaturesSummary, FeaturesView, features_view,
};
pub use integrations::{
    IntegrationResult, IntegrationsQuery, IntegrationsSummary, IntegrationsView,
    integrations_view,
};
pub use pricing::{
    PriceRange, PricingQuery, PricingResult, PricingSort, PricingSummary, PricingView,
    TierSummary, pricing_view,
};

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use survey_core::entities::ExtractionRecord;
use survey_core::payload::FromPayload;

use crate::history::latest_per_entity;

/// Where a view row came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ViewSource {
    pub entity_id: String,
    pub entity_name: String,
    pub entity_url: Option<String>,
    pub extracted_at: DateTime<Utc>,
    pub source_url: String,
}

impl From<&ExtractionRecord> for ViewSource {
    fn from(record: &ExtractionRecord) -> Self {
        Self {
            entity_id: record.entity_id.clone(),
            entity_name: record.entity_name.clone(),
            entity_url: record.entity_url.clone(),
            extracted_at: record.extracted_at,
            source_url: record.source_url.clone(),
        }
    }
}

/// A name and how many entities reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Frequency {
    pub name: String,
    pub count: usize,
}

/// Count names, most frequent first, ties by name, capped at `top`.
pub(crate) fn top_frequencies<I>(names: I, top: usize) -> Vec<Frequency>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for name in names {
        *counts.entry(name).or_default() += 1;
    }
    let mut table: Vec<Frequency> = counts
        .into_iter()
        .map(|(name, count)| Frequency { name, count })
        .collect();
    table.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    table.truncate(top);
    table
}

/// Alphabetical, case-insensitive first.
pub(crate) fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

pub(crate) fn contains_term(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Mean rounded to a whole number, 0 for no rows.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub(crate) fn rounded_mean(total: u64, rows: usize) -> u64 {
    if rows == 0 {
        return 0;
    }
    (total as f64 / rows as f64).round() as u64
}

/// Newest completed capture per entity of `T`'s schema type, parsed.
pub(crate) fn typed_latest<T: FromPayload>(records: &[ExtractionRecord]) -> Vec<(ViewSource, T)> {
    let candidates: Vec<ExtractionRecord> = records
        .iter()
        .filter(|record| record.schema_type == T::SCHEMA && record.is_completed())
        .cloned()
        .collect();

    latest_per_entity(&candidates)
        .iter()
        .map(|record| {
            if !record.data.is_object() {
                tracing::warn!(
                    extraction_id = %record.id,
                    schema_type = %T::SCHEMA,
                    "payload is not an object, reading defaults"
                );
            }
            (ViewSource::from(record), T::from_payload(&record.data))
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod test_records {
    use chrono::{Duration, Utc};
    use serde_json::Value;
    use survey_core::entities::ExtractionRecord;
    use survey_core::enums::{ExtractionStatus, SchemaType};

    pub fn record(entity: &str, schema: SchemaType, hours_ago: i64, data: Value) -> ExtractionRecord {
        ExtractionRecord {
            id: format!("ext-{entity}-{hours_ago}"),
            entity_id: format!("ent-{entity}"),
            entity_name: entity.into(),
            entity_url: None,
            entity_type: None,
            schema_type: schema,
            data,
            extracted_at: Utc::now() - Duration::hours(hours_ago),
            status: ExtractionStatus::Completed,
            source_id: "src".into(),
            source_url: format!("https://{entity}.example"),
            confidence: None,
            screenshot_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn frequencies_break_ties_by_name() {
        let names = ["Slack", "GitHub", "Jira", "GitHub", "Slack", "Asana"]
            .into_iter()
            .map(String::from);
        let table = top_frequencies(names, 3);
        assert_eq!(
            table,
            vec![
                Frequency { name: "GitHub".into(), count: 2 },
                Frequency { name: "Slack".into(), count: 2 },
                Frequency { name: "Asana".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn names_sort_case_insensitively() {
        let mut names = vec!["beta", "Alpha", "alpha", "Gamma"];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(names, vec!["Alpha", "alpha", "beta", "Gamma"]);
    }

    #[test]
    fn typed_latest_parses_newest_capture_per_entity() {
        use serde_json::json;
        use survey_core::enums::SchemaType;
        use survey_core::payload::CompanyData;

        let records = vec![
            test_records::record("acme", SchemaType::Company, 1, json!({"founded": "2015"})),
            test_records::record("acme", SchemaType::Company, 5, json!({"founded": "2001"})),
            test_records::record("acme", SchemaType::Pricing, 0, json!({"founded": "1999"})),
            test_records::record("globex", SchemaType::Company, 2, json!("not an object")),
        ];

        let parsed = typed_latest::<CompanyData>(&records);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].1.founding_year(), Some(2015));
        assert_eq!(parsed[1].1, CompanyData::default());
    }

    #[test]
    fn rounded_mean_handles_empty() {
        assert_eq!(rounded_mean(0, 0), 0);
        assert_eq!(rounded_mean(7, 2), 4);
    }
}
