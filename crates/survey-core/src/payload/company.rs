use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::FromPayload;
use super::fields::{string_list, text};
use crate::enums::SchemaType;

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}").expect("year pattern is valid"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FundingInfo {
    /// `$50M` style text.
    pub total_raised: Option<String>,
    pub last_round: Option<String>,
    pub last_round_amount: Option<String>,
    pub last_round_date: Option<String>,
    pub investors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CompanyData {
    pub name: Option<String>,
    pub legal_name: Option<String>,
    /// Free text: `2015`, `Founded in March 2019`.
    pub founded: Option<String>,
    pub headquarters: Option<String>,
    pub employee_count: Option<String>,
    pub funding: Option<FundingInfo>,
}

impl CompanyData {
    /// Founding year: the first run of four ASCII digits in `founded`.
    #[must_use]
    pub fn founding_year(&self) -> Option<i32> {
        let founded = self.founded.as_deref()?;
        YEAR.find(founded)?.as_str().parse().ok()
    }

    #[must_use]
    pub fn total_funding(&self) -> Option<&str> {
        self.funding.as_ref()?.total_raised.as_deref()
    }

    #[must_use]
    pub fn last_round(&self) -> Option<&str> {
        self.funding.as_ref()?.last_round.as_deref()
    }
}

impl FromPayload for CompanyData {
    const SCHEMA: SchemaType = SchemaType::Company;

    fn from_payload(data: &Value) -> Self {
        let funding = data
            .get("funding")
            .filter(|funding| funding.is_object())
            .map(|funding| FundingInfo {
                total_raised: text(funding, "totalRaised"),
                last_round: text(funding, "lastRound"),
                last_round_amount: text(funding, "lastRoundAmount"),
                last_round_date: text(funding, "lastRoundDate"),
                investors: string_list(funding, "investors"),
            });

        Self {
            name: text(data, "name"),
            legal_name: text(data, "legalName"),
            founded: text(data, "founded"),
            headquarters: text(data, "headquarters"),
            employee_count: text(data, "employeeCount"),
            funding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn founding_year_takes_first_four_digit_run() {
        let data = CompanyData::from_payload(&json!({"founded": "Founded March 2019, relaunched 2021"}));
        assert_eq!(data.founding_year(), Some(2019));
    }

    #[test]
    fn founding_year_skips_non_ascii_digit_runs() {
        let data = CompanyData::from_payload(&json!({"founded": "١٩٩٩ (est. 2005)"}));
        assert_eq!(data.founding_year(), Some(2005));
    }

    #[test]
    fn numeric_founded_is_read_as_text() {
        let data = CompanyData::from_payload(&json!({"founded": 2011}));
        assert_eq!(data.founding_year(), Some(2011));
    }

    #[test]
    fn founding_year_absent_without_digits() {
        let data = CompanyData::from_payload(&json!({"founded": "early nineties"}));
        assert_eq!(data.founding_year(), None);
        assert_eq!(CompanyData::default().founding_year(), None);
    }

    #[test]
    fn funding_fields_are_optional() {
        let data = CompanyData::from_payload(&json!({
            "name": "Acme",
            "funding": {"totalRaised": "$50M", "lastRound": "Series B"}
        }));
        assert_eq!(data.total_funding(), Some("$50M"));
        assert_eq!(data.last_round(), Some("Series B"));
        assert!(CompanyData::default().total_funding().is_none());
    }
}
