use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use survey_core::entities::ExtractionRecord;
use survey_core::payload::{IntegrationCategory, IntegrationsData};

use super::{
    Frequency, ViewSource, compare_names, contains_term, rounded_mean, top_frequencies,
    typed_latest,
};

const TOP_INTEGRATIONS: usize = 15;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IntegrationsQuery {
    pub project_id: String,
    pub has_api: Option<bool>,
    pub has_sdk: Option<bool>,
    /// Matched against integration and category names.
    pub search_term: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IntegrationResult {
    #[serde(flatten)]
    pub source: ViewSource,
    /// Vendor-reported count, or the number listed when none was reported.
    pub total_count: u64,
    pub has_api: bool,
    pub has_webhooks: bool,
    pub has_sdk: bool,
    pub sdk_languages: Vec<String>,
    pub categories: Vec<IntegrationCategory>,
}

impl IntegrationResult {
    fn new(source: ViewSource, data: IntegrationsData) -> Self {
        let listed: usize = data.categories.iter().map(|cat| cat.integrations.len()).sum();
        Self {
            source,
            total_count: if data.total_count > 0 {
                data.total_count
            } else {
                listed as u64
            },
            has_api: data.has_api,
            has_webhooks: data.has_webhooks,
            has_sdk: data.has_sdk,
            sdk_languages: data.sdk_languages,
            categories: data.categories,
        }
    }

    fn names(&self) -> impl Iterator<Item = &String> {
        self.categories.iter().flat_map(|cat| &cat.integrations)
    }

    fn admitted_by(&self, query: &IntegrationsQuery) -> bool {
        let search_ok = query.search_term.as_deref().is_none_or(|term| {
            let term = term.to_lowercase();
            self.names().any(|name| contains_term(name, &term))
                || self.categories.iter().any(|cat| contains_term(&cat.name, &term))
        });
        query.has_api.is_none_or(|want| self.has_api == want)
            && query.has_sdk.is_none_or(|want| self.has_sdk == want)
            && search_ok
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IntegrationsSummary {
    pub total_with_integrations: usize,
    pub with_api: usize,
    pub with_sdk: usize,
    pub with_webhooks: usize,
    pub average_integration_count: u64,
    /// Integration names across every entity, before filtering.
    pub common_integrations: Vec<Frequency>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IntegrationsView {
    pub results: Vec<IntegrationResult>,
    pub summary: IntegrationsSummary,
}

#[must_use]
pub fn integrations_view(
    records: &[ExtractionRecord],
    query: &IntegrationsQuery,
) -> IntegrationsView {
    let all: Vec<IntegrationResult> = typed_latest::<IntegrationsData>(records)
        .into_iter()
        .map(|(source, data)| IntegrationResult::new(source, data))
        .collect();

    let common_integrations =
        top_frequencies(all.iter().flat_map(IntegrationResult::names).cloned(), TOP_INTEGRATIONS);

    let mut results: Vec<IntegrationResult> = all
        .into_iter()
        .filter(|result| result.admitted_by(query))
        .collect();
    results.sort_by(|a, b| compare_names(&a.source.entity_name, &b.source.entity_name));

    let total: u64 = results.iter().map(|r| r.total_count).sum();
    let summary = IntegrationsSummary {
        total_with_integrations: results.len(),
        with_api: results.iter().filter(|r| r.has_api).count(),
        with_sdk: results.iter().filter(|r| r.has_sdk).count(),
        with_webhooks: results.iter().filter(|r| r.has_webhooks).count(),
        average_integration_count: rounded_mean(total, results.len()),
        common_integrations,
    };

    IntegrationsView { results, summary }
}
