//! Schema types, extraction status, research priority, and diff alignment for Survey.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and expose `as_str()` for SQL storage and display.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// SchemaType
// ---------------------------------------------------------------------------

/// The structured-data shape an extraction payload conforms to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SchemaType {
    Pricing,
    Features,
    Company,
    Compliance,
    Integrations,
}

impl SchemaType {
    /// Every schema type, in the canonical coverage order.
    pub const ALL: [Self; 5] = [
        Self::Pricing,
        Self::Features,
        Self::Company,
        Self::Compliance,
        Self::Integrations,
    ];

    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pricing => "pricing",
            Self::Features => "features",
            Self::Company => "company",
            Self::Compliance => "compliance",
            Self::Integrations => "integrations",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|schema| schema.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::Validation(format!("unknown schema type '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// ExtractionStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of an extraction.
///
/// ```text
/// pending → completed
///         → failed
/// ```
///
/// Only `completed` extractions take part in diffs, gaps, and queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    Pending,
    Completed,
    Failed,
}

impl ExtractionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ExtractionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// How urgently an entity should be researched next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank: `high` first.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ArrayAlignment
// ---------------------------------------------------------------------------

/// How the tree differ pairs up elements of two arrays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ArrayAlignment {
    /// Compare elements at equal indices.
    #[default]
    Index,
    /// Match object elements by an identifying field (`name`, `id`, `key`,
    /// `title`, `type`), falling back to `Index` when none qualifies.
    Keyed,
}

impl ArrayAlignment {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Keyed => "keyed",
        }
    }
}

impl fmt::Display for ArrayAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_type_serializes_snake_case() {
        let json = serde_json::to_string(&SchemaType::Integrations).unwrap();
        assert_eq!(json, "\"integrations\"");
        let parsed: SchemaType = serde_json::from_str("\"company\"").unwrap();
        assert_eq!(parsed, SchemaType::Company);
    }

    #[test]
    fn schema_type_from_str_is_case_insensitive() {
        assert_eq!("Pricing".parse::<SchemaType>().unwrap(), SchemaType::Pricing);
        assert_eq!(" features ".parse::<SchemaType>().unwrap(), SchemaType::Features);
    }

    #[test]
    fn schema_type_from_str_rejects_unknown() {
        let err = "reviews".parse::<SchemaType>().unwrap_err();
        assert!(err.to_string().contains("unknown schema type 'reviews'"));
    }

    #[test]
    fn as_str_matches_serde_for_all_schema_types() {
        for schema in SchemaType::ALL {
            let json = serde_json::to_string(&schema).unwrap();
            assert_eq!(json, format!("\"{}\"", schema.as_str()));
        }
    }

    #[test]
    fn priority_rank_orders_high_first() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
    }

    #[test]
    fn extraction_status_display() {
        assert_eq!(ExtractionStatus::Completed.to_string(), "completed");
        assert_eq!(ExtractionStatus::Failed.as_str(), "failed");
    }

    #[test]
    fn array_alignment_defaults_to_index() {
        assert_eq!(ArrayAlignment::default(), ArrayAlignment::Index);
        let parsed: ArrayAlignment = serde_json::from_str("\"keyed\"").unwrap();
        assert_eq!(parsed, ArrayAlignment::Keyed);
    }
}
