use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use survey_core::entities::ExtractionRecord;
use survey_core::payload::FeaturesData;

use super::{
    Frequency, ViewSource, compare_names, contains_term, rounded_mean, top_frequencies,
    typed_latest,
};

const TOP_CATEGORIES: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FeaturesQuery {
    pub project_id: String,
    /// Matched against feature names, category names, and highlights.
    pub search_term: Option<String>,
    /// Matched against category names.
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CategorySummary {
    pub name: String,
    pub feature_count: usize,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FeatureResult {
    #[serde(flatten)]
    pub source: ViewSource,
    pub highlights: Vec<String>,
    pub categories: Vec<CategorySummary>,
    pub total_features: usize,
}

impl FeatureResult {
    fn new(source: ViewSource, data: FeaturesData) -> Self {
        Self {
            source,
            total_features: data.total_features(),
            highlights: data.highlights,
            categories: data
                .categories
                .into_iter()
                .map(|cat| CategorySummary {
                    name: cat.name,
                    feature_count: cat.features.len(),
                    features: cat.features,
                })
                .collect(),
        }
    }

    fn admitted_by(&self, query: &FeaturesQuery) -> bool {
        let category_ok = query.category.as_deref().is_none_or(|term| {
            let term = term.to_lowercase();
            self.categories.iter().any(|cat| contains_term(&cat.name, &term))
        });
        let search_ok = query.search_term.as_deref().is_none_or(|term| {
            let term = term.to_lowercase();
            self.highlights.iter().any(|h| contains_term(h, &term))
                || self.categories.iter().any(|cat| {
                    contains_term(&cat.name, &term)
                        || cat.features.iter().any(|f| contains_term(f, &term))
                })
        });
        category_ok && search_ok
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FeaturesSummary {
    pub total_with_features: usize,
    pub average_feature_count: u64,
    /// Category names across every entity, before filtering.
    pub common_categories: Vec<Frequency>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FeaturesView {
    pub results: Vec<FeatureResult>,
    pub summary: FeaturesSummary,
}

#[must_use]
pub fn features_view(records: &[ExtractionRecord], query: &FeaturesQuery) -> FeaturesView {
    let all: Vec<FeatureResult> = typed_latest::<FeaturesData>(records)
        .into_iter()
        .map(|(source, data)| FeatureResult::new(source, data))
        .collect();

    let common_categories = top_frequencies(
        all.iter()
            .flat_map(|result| &result.categories)
            .filter(|cat| !cat.name.is_empty())
            .map(|cat| cat.name.clone()),
        TOP_CATEGORIES,
    );

    let mut results: Vec<FeatureResult> = all
        .into_iter()
        .filter(|result| result.admitted_by(query))
        .collect();
    results.sort_by(|a, b| compare_names(&a.source.entity_name, &b.source.entity_name));

    let total: usize = results.iter().map(|r| r.total_features).sum();
    let summary = FeaturesSummary {
        total_with_features: results.len(),
        average_feature_count: rounded_mean(total as u64, results.len()),
        common_categories,
    };

    FeaturesView { results, summary }
}
