use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::FromPayload;
use super::fields::{array, flag, string_list, text};
use crate::enums::SchemaType;

/// Status string that marks a certification as held.
pub const CERTIFIED: &str = "certified";

/// A security or compliance certification (`SOC 2 Type II`, `ISO 27001`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Certification {
    pub name: String,
    /// `certified`, `in_progress`, `planned`, `unknown`.
    pub status: Option<String>,
}

impl Certification {
    #[must_use]
    pub fn is_certified(&self) -> bool {
        self.status.as_deref() == Some(CERTIFIED)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ComplianceData {
    pub certifications: Vec<Certification>,
    pub security_features: Vec<String>,
    pub data_residency: Vec<String>,
    pub soc2: bool,
    pub gdpr_compliant: bool,
    pub hipaa_compliant: bool,
    /// `Authorized`, `In Process`, `None`.
    pub fed_ramp_status: Option<String>,
}

impl ComplianceData {
    /// Whether a FedRAMP status other than `None` was reported.
    #[must_use]
    pub fn has_fed_ramp(&self) -> bool {
        self.fed_ramp_status
            .as_deref()
            .is_some_and(|status| status != "None")
    }
}

impl FromPayload for ComplianceData {
    const SCHEMA: SchemaType = SchemaType::Compliance;

    fn from_payload(data: &Value) -> Self {
        let certifications = array(data, "certifications")
            .iter()
            .filter_map(|cert| {
                Some(Certification {
                    name: text(cert, "name")?,
                    status: text(cert, "status"),
                })
            })
            .collect();

        Self {
            certifications,
            security_features: string_list(data, "securityFeatures"),
            data_residency: string_list(data, "dataResidency"),
            soc2: flag(data, "soc2"),
            gdpr_compliant: flag(data, "gdprCompliant"),
            hipaa_compliant: flag(data, "hipaaCompliant"),
            fed_ramp_status: text(data, "fedRampStatus"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn booleans_default_to_false() {
        let data = ComplianceData::from_payload(&json!({"soc2": true}));
        assert!(data.soc2);
        assert!(!data.gdpr_compliant);
        assert!(!data.hipaa_compliant);
        assert!(data.certifications.is_empty());
        assert!(!data.has_fed_ramp());
    }

    #[test]
    fn certifications_without_name_are_skipped() {
        let data = ComplianceData::from_payload(&json!({
            "certifications": [
                {"name": "ISO 27001", "status": "certified"},
                {"status": "planned"},
                {"name": "SOC 2", "status": "in_progress"}
            ],
            "fedRampStatus": "None"
        }));

        assert_eq!(data.certifications.len(), 2);
        assert!(data.certifications[0].is_certified());
        assert!(!data.certifications[1].is_certified());
        assert!(!data.has_fed_ramp());
    }
}
