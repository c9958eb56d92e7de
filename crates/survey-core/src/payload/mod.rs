//! Typed schema payloads parsed with defaults from opaque extraction data.
//!
//! Generic utilities (diff, search, query) work on `serde_json::Value`. The
//! schema-specialized views work on these typed records instead, obtained through
//! [`FromPayload::from_payload`], which never fails: malformed or partial payloads
//! degrade to empty arrays, `false`, and `None`.

pub mod fields;

mod company;
mod compliance;
mod features;
mod integrations;
mod pricing;

pub use company::{CompanyData, FundingInfo};
pub use compliance::{Certification, ComplianceData};
pub use features::{FeatureCategory, FeaturesData};
pub use integrations::{IntegrationCategory, IntegrationsData};
pub use pricing::{PricingData, PricingTier};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::SchemaType;

/// Parse a typed record from an opaque payload, substituting defaults.
pub trait FromPayload: Sized {
    /// The schema type whose payloads this record reads.
    const SCHEMA: SchemaType;

    fn from_payload(data: &Value) -> Self;
}

/// A payload interpreted according to its schema type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "schema_type", content = "data", rename_all = "snake_case")]
pub enum SchemaPayload {
    Pricing(PricingData),
    Features(FeaturesData),
    Company(CompanyData),
    Compliance(ComplianceData),
    Integrations(IntegrationsData),
}

impl SchemaPayload {
    /// Interpret `data` as the typed record for `schema`.
    #[must_use]
    pub fn parse(schema: SchemaType, data: &Value) -> Self {
        match schema {
            SchemaType::Pricing => Self::Pricing(PricingData::from_payload(data)),
            SchemaType::Features => Self::Features(FeaturesData::from_payload(data)),
            SchemaType::Company => Self::Company(CompanyData::from_payload(data)),
            SchemaType::Compliance => Self::Compliance(ComplianceData::from_payload(data)),
            SchemaType::Integrations => Self::Integrations(IntegrationsData::from_payload(data)),
        }
    }

    #[must_use]
    pub const fn schema_type(&self) -> SchemaType {
        match self {
            Self::Pricing(_) => SchemaType::Pricing,
            Self::Features(_) => SchemaType::Features,
            Self::Company(_) => SchemaType::Company,
            Self::Compliance(_) => SchemaType::Compliance,
            Self::Integrations(_) => SchemaType::Integrations,
        }
    }
}
