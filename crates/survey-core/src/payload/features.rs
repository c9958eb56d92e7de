use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::FromPayload;
use super::fields::{array, entry_name, string_list, text};
use crate::enums::SchemaType;

/// A named group of features (`AI Capabilities`, `Security`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FeatureCategory {
    pub name: String,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FeaturesData {
    pub categories: Vec<FeatureCategory>,
    pub highlights: Vec<String>,
}

impl FeaturesData {
    #[must_use]
    pub fn total_features(&self) -> usize {
        self.categories.iter().map(|cat| cat.features.len()).sum()
    }
}

impl FromPayload for FeaturesData {
    const SCHEMA: SchemaType = SchemaType::Features;

    fn from_payload(data: &Value) -> Self {
        let categories = array(data, "categories")
            .iter()
            .map(|cat| FeatureCategory {
                name: text(cat, "name").unwrap_or_default(),
                features: array(cat, "features").iter().filter_map(entry_name).collect(),
            })
            .collect();

        Self {
            categories,
            highlights: string_list(data, "highlights"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn features_accept_strings_and_objects() {
        let data = FeaturesData::from_payload(&json!({
            "categories": [
                {"name": "Security", "features": ["SSO", {"name": "SCIM", "isNew": true}]},
                {"name": "AI", "features": [{"description": "unnamed"}]}
            ],
            "highlights": ["Fast"]
        }));

        assert_eq!(data.categories[0].features, vec!["SSO", "SCIM"]);
        assert!(data.categories[1].features.is_empty());
        assert_eq!(data.total_features(), 2);
        assert_eq!(data.highlights, vec!["Fast"]);
    }
}
