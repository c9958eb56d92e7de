use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::FromPayload;
use super::fields::{array, entry_name, flag, number, string_list, text};
use crate::enums::SchemaType;

/// A named group of integrations (`CI/CD`, `IDEs`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IntegrationCategory {
    pub name: String,
    pub integrations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IntegrationsData {
    pub categories: Vec<IntegrationCategory>,
    /// Vendor-reported integration count, `0` when absent.
    pub total_count: u64,
    pub has_api: bool,
    pub api_doc_url: Option<String>,
    pub has_webhooks: bool,
    pub has_sdk: bool,
    pub sdk_languages: Vec<String>,
}

impl FromPayload for IntegrationsData {
    const SCHEMA: SchemaType = SchemaType::Integrations;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn from_payload(data: &Value) -> Self {
        let categories = array(data, "categories")
            .iter()
            .map(|cat| IntegrationCategory {
                name: text(cat, "name").unwrap_or_default(),
                integrations: array(cat, "integrations")
                    .iter()
                    .filter_map(entry_name)
                    .collect(),
            })
            .collect();

        Self {
            categories,
            total_count: number(data, "totalCount")
                .filter(|count| count.is_finite() && *count > 0.0)
                .map_or(0, |count| count as u64),
            has_api: flag(data, "hasApi"),
            api_doc_url: text(data, "apiDocUrl"),
            has_webhooks: flag(data, "hasWebhooks"),
            has_sdk: flag(data, "hasSdk"),
            sdk_languages: string_list(data, "sdkLanguages"),
        }
    }
}
