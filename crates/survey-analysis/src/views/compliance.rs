use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use survey_core::entities::ExtractionRecord;
use survey_core::payload::{Certification, ComplianceData};

use super::{Frequency, ViewSource, compare_names, contains_term, top_frequencies, typed_latest};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ComplianceQuery {
    pub project_id: String,
    pub soc2: Option<bool>,
    /// Compared case-insensitively.
    pub fed_ramp_status: Option<String>,
    pub gdpr_compliant: Option<bool>,
    pub hipaa_compliant: Option<bool>,
    /// Matches a held certification whose name contains this term.
    pub has_certification: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ComplianceResult {
    #[serde(flatten)]
    pub source: ViewSource,
    pub soc2: bool,
    pub fed_ramp_status: Option<String>,
    pub gdpr_compliant: bool,
    pub hipaa_compliant: bool,
    pub certifications: Vec<Certification>,
    pub security_features: Vec<String>,
    pub data_residency: Vec<String>,
}

impl ComplianceResult {
    fn new(source: ViewSource, data: ComplianceData) -> Self {
        Self {
            source,
            soc2: data.soc2,
            fed_ramp_status: data.fed_ramp_status,
            gdpr_compliant: data.gdpr_compliant,
            hipaa_compliant: data.hipaa_compliant,
            certifications: data.certifications,
            security_features: data.security_features,
            data_residency: data.data_residency,
        }
    }

    fn has_fed_ramp(&self) -> bool {
        self.fed_ramp_status
            .as_deref()
            .is_some_and(|status| status != "None")
    }

    fn admitted_by(&self, query: &ComplianceQuery) -> bool {
        let fed_ramp_ok = query.fed_ramp_status.as_deref().is_none_or(|want| {
            self.fed_ramp_status
                .as_deref()
                .is_some_and(|status| status.eq_ignore_ascii_case(want))
        });
        let certification_ok = query.has_certification.as_deref().is_none_or(|term| {
            let term = term.to_lowercase();
            self.certifications
                .iter()
                .any(|cert| cert.is_certified() && contains_term(&cert.name, &term))
        });

        query.soc2.is_none_or(|want| self.soc2 == want)
            && query.gdpr_compliant.is_none_or(|want| self.gdpr_compliant == want)
            && query.hipaa_compliant.is_none_or(|want| self.hipaa_compliant == want)
            && fed_ramp_ok
            && certification_ok
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ComplianceSummary {
    pub total_with_compliance: usize,
    pub with_soc2: usize,
    pub with_fed_ramp: usize,
    pub with_gdpr: usize,
    pub with_hipaa: usize,
    /// Held certifications across every entity, before filtering.
    pub certification_counts: Vec<Frequency>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ComplianceView {
    pub results: Vec<ComplianceResult>,
    pub summary: ComplianceSummary,
}

#[must_use]
pub fn compliance_view(records: &[ExtractionRecord], query: &ComplianceQuery) -> ComplianceView {
    let all: Vec<ComplianceResult> = typed_latest::<ComplianceData>(records)
        .into_iter()
        .map(|(source, data)| ComplianceResult::new(source, data))
        .collect();

    let certification_counts = top_frequencies(
        all.iter()
            .flat_map(|result| &result.certifications)
            .filter(|cert| cert.is_certified())
            .map(|cert| cert.name.clone()),
        usize::MAX,
    );

    let mut results: Vec<ComplianceResult> = all
        .into_iter()
        .filter(|result| result.admitted_by(query))
        .collect();
    results.sort_by(|a, b| compare_names(&a.source.entity_name, &b.source.entity_name));

    let summary = ComplianceSummary {
        total_with_compliance: results.len(),
        with_soc2: results.iter().filter(|r| r.soc2).count(),
        with_fed_ramp: results.iter().filter(|r| r.has_fed_ramp()).count(),
        with_gdpr: results.iter().filter(|r| r.gdpr_compliant).count(),
        with_hipaa: results.iter().filter(|r| r.hipaa_compliant).count(),
        certification_counts,
    };

    ComplianceView { results, summary }
}
