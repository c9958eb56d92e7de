use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use survey_core::entities::ExtractionRecord;
use survey_core::payload::CompanyData;

use super::{Frequency, ViewSource, compare_names, top_frequencies, typed_latest};

const TOP_LOCATIONS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CompanyQuery {
    pub project_id: String,
    pub min_founding: Option<i32>,
    pub max_founding: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CompanyResult {
    #[serde(flatten)]
    pub source: ViewSource,
    /// Reported company name, else the entity name.
    pub company_name: String,
    pub founded: Option<String>,
    pub founding_year: Option<i32>,
    pub headquarters: Option<String>,
    pub employee_count: Option<String>,
    pub total_funding: Option<String>,
    pub last_round: Option<String>,
}

impl CompanyResult {
    fn new(source: ViewSource, data: &CompanyData) -> Self {
        Self {
            company_name: data.name.clone().unwrap_or_else(|| source.entity_name.clone()),
            founded: data.founded.clone(),
            founding_year: data.founding_year(),
            headquarters: data.headquarters.clone(),
            employee_count: data.employee_count.clone(),
            total_funding: data.total_funding().map(str::to_string),
            last_round: data.last_round().map(str::to_string),
            source,
        }
    }

    fn admitted_by(&self, query: &CompanyQuery) -> bool {
        let Some(year) = self.founding_year else {
            return true;
        };
        query.min_founding.is_none_or(|min| year >= min)
            && query.max_founding.is_none_or(|max| year <= max)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct YearRange {
    pub earliest: Option<i32>,
    pub latest: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CompanySummary {
    pub total_with_company_info: usize,
    pub with_funding: usize,
    /// Across every entity, before filtering.
    pub founding_year_range: YearRange,
    /// Across every entity, before filtering.
    pub headquarter_locations: Vec<Frequency>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CompanyView {
    pub results: Vec<CompanyResult>,
    pub summary: CompanySummary,
}

#[must_use]
pub fn company_view(records: &[ExtractionRecord], query: &CompanyQuery) -> CompanyView {
    let all: Vec<CompanyResult> = typed_latest::<CompanyData>(records)
        .into_iter()
        .map(|(source, data)| CompanyResult::new(source, &data))
        .collect();

    let years = || all.iter().filter_map(|result| result.founding_year);
    let founding_year_range = YearRange {
        earliest: years().min(),
        latest: years().max(),
    };
    let headquarter_locations = top_frequencies(
        all.iter().filter_map(|result| result.headquarters.clone()),
        TOP_LOCATIONS,
    );

    let mut results: Vec<CompanyResult> = all
        .into_iter()
        .filter(|result| result.admitted_by(query))
        .collect();
    results.sort_by(|a, b| compare_names(&a.source.entity_name, &b.source.entity_name));

    let summary = CompanySummary {
        total_with_company_info: results.len(),
        with_funding: results.iter().filter(|r| r.total_funding.is_some()).count(),
        founding_year_range,
        headquarter_locations,
    };

    CompanyView { results, summary }
}
