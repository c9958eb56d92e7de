use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ExtractionStatus, SchemaType};

/// One structured-data capture for an entity, joined with its entity and source.
///
/// `data` is opaque: its shape depends on `schema_type` but is never enforced
/// here. Typed access parses it with [`crate::payload::FromPayload`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ExtractionRecord {
    pub id: String,
    pub entity_id: String,
    pub entity_name: String,
    pub entity_url: Option<String>,
    pub entity_type: Option<String>,
    pub schema_type: SchemaType,
    pub data: serde_json::Value,
    pub extracted_at: DateTime<Utc>,
    pub status: ExtractionStatus,
    pub source_id: String,
    pub source_url: String,
    /// Extractor confidence in `0.0..=1.0`.
    pub confidence: Option<f64>,
    pub screenshot_path: Option<String>,
}

impl ExtractionRecord {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == ExtractionStatus::Completed
    }
}
