//! Analysis engine configuration: gap schema set, default limits, diff tuning.

use serde::{Deserialize, Serialize};
use survey_core::enums::{ArrayAlignment, SchemaType};

use crate::ConfigError;

fn default_schema_types() -> Vec<SchemaType> {
    SchemaType::ALL.to_vec()
}

const fn default_history_limit() -> u32 {
    20
}

const fn default_query_limit() -> u32 {
    100
}

const fn default_recent_days() -> u32 {
    30
}

const fn default_max_depth() -> usize {
    64
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Schema types every entity is expected to have, in report order.
    #[serde(default = "default_schema_types")]
    pub schema_types: Vec<SchemaType>,

    /// Extractions returned by a history request without an explicit limit.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,

    /// Results returned by a generic query without an explicit limit.
    #[serde(default = "default_query_limit")]
    pub query_limit: u32,

    /// Look-back window for recent-change scans, in days.
    #[serde(default = "default_recent_days")]
    pub recent_days: u32,

    #[serde(default)]
    pub array_alignment: ArrayAlignment,

    /// Deepest nesting the differ will walk before giving up.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            schema_types: default_schema_types(),
            history_limit: default_history_limit(),
            query_limit: default_query_limit(),
            recent_days: default_recent_days(),
            array_alignment: ArrayAlignment::default(),
            max_depth: default_max_depth(),
        }
    }
}

impl AnalysisConfig {
    /// Reject values the engine cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an empty schema set, a zero
    /// limit, or a zero diff depth.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, reason: &str| ConfigError::InvalidValue {
            field: format!("analysis.{field}"),
            reason: reason.into(),
        };

        if self.schema_types.is_empty() {
            return Err(invalid("schema_types", "at least one schema type is required"));
        }
        if self.history_limit == 0 {
            return Err(invalid("history_limit", "must be greater than zero"));
        }
        if self.query_limit == 0 {
            return Err(invalid("query_limit", "must be greater than zero"));
        }
        if self.max_depth == 0 {
            return Err(invalid("max_depth", "must be greater than zero"));
        }
        Ok(())
    }
}
