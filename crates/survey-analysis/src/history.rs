//! Recency ordering, dedup-by-recency, and per-entity extraction history.

use std::collections::HashSet;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use survey_core::entities::{Entity, ExtractionRecord};
use survey_core::enums::{ExtractionStatus, SchemaType};

use crate::diff::{ChangeType, DiffOptions, ExtractionDiff, diff_values};
use crate::error::AnalysisError;

const PREVIEW_DEPTH: usize = 2;
const PREVIEW_TEXT: usize = 100;
const PREVIEW_ITEMS: usize = 3;
const PREVIEW_KEYS: usize = 5;

const DAY_MS: f64 = 86_400_000.0;

// ---------------------------------------------------------------------------
// Dedup-by-recency
// ---------------------------------------------------------------------------

/// Stable sort by capture time, newest first.
pub fn sort_most_recent_first(records: &mut [ExtractionRecord]) {
    records.sort_by(|a, b| b.extracted_at.cmp(&a.extracted_at));
}

/// Keep the newest record per `(entity, schema type)`, newest first.
#[must_use]
pub fn latest_per_entity_schema(records: &[ExtractionRecord]) -> Vec<ExtractionRecord> {
    latest_by(records, |record| (record.entity_id.clone(), record.schema_type))
}

/// Keep the newest record per entity, newest first. Meant for single-schema sets.
#[must_use]
pub fn latest_per_entity(records: &[ExtractionRecord]) -> Vec<ExtractionRecord> {
    latest_by(records, |record| record.entity_id.clone())
}

fn latest_by<K, F>(records: &[ExtractionRecord], key: F) -> Vec<ExtractionRecord>
where
    K: Eq + Hash,
    F: Fn(&ExtractionRecord) -> K,
{
    let mut sorted = records.to_vec();
    sort_most_recent_first(&mut sorted);
    let mut seen = HashSet::new();
    sorted.retain(|record| seen.insert(key(record)));
    sorted
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HistoryEntry {
    pub id: String,
    pub extracted_at: DateTime<Utc>,
    pub status: ExtractionStatus,
    pub confidence: Option<f64>,
    pub source_url: String,
    pub screenshot_path: Option<String>,
    /// Truncated copy of the payload.
    pub data_preview: Value,
}

impl From<&ExtractionRecord> for HistoryEntry {
    fn from(record: &ExtractionRecord) -> Self {
        Self {
            id: record.id.clone(),
            extracted_at: record.extracted_at,
            status: record.status,
            confidence: record.confidence,
            source_url: record.source_url.clone(),
            screenshot_path: record.screenshot_path.clone(),
            data_preview: data_preview(&record.data),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExtractionHistory {
    pub entity_id: String,
    pub entity_name: String,
    pub schema_type: SchemaType,
    pub total_extractions: usize,
    pub extractions: Vec<HistoryEntry>,
    pub first_extraction: Option<DateTime<Utc>>,
    pub latest_extraction: Option<DateTime<Utc>>,
    pub average_days_between: Option<f64>,
}

/// Build the capture timeline for one entity and schema type.
///
/// Records of every status are listed; at most `limit` of the newest are kept.
#[must_use]
pub fn build_history(
    entity: &Entity,
    schema_type: SchemaType,
    records: &[ExtractionRecord],
    limit: usize,
) -> ExtractionHistory {
    let mut records: Vec<ExtractionRecord> = records
        .iter()
        .filter(|record| record.schema_type == schema_type && record.entity_id == entity.id)
        .cloned()
        .collect();
    sort_most_recent_first(&mut records);
    records.truncate(limit);

    ExtractionHistory {
        entity_id: entity.id.clone(),
        entity_name: entity.name.clone(),
        schema_type,
        total_extractions: records.len(),
        extractions: records.iter().map(HistoryEntry::from).collect(),
        first_extraction: records.last().map(|record| record.extracted_at),
        latest_extraction: records.first().map(|record| record.extracted_at),
        average_days_between: average_days_between(&records),
    }
}

/// Mean gap between consecutive captures in days, to one decimal.
#[allow(clippy::cast_precision_loss)]
fn average_days_between(records: &[ExtractionRecord]) -> Option<f64> {
    if records.len() < 2 {
        return None;
    }
    let total: f64 = records
        .windows(2)
        .map(|pair| {
            let gap = pair[0].extracted_at - pair[1].extracted_at;
            gap.num_milliseconds().abs() as f64 / DAY_MS
        })
        .sum();
    let mean = total / (records.len() - 1) as f64;
    Some((mean * 10.0).round() / 10.0)
}

/// Readable truncation of a payload: two levels deep, long strings cut,
/// arrays cut to three items, objects cut to five keys.
#[must_use]
pub fn data_preview(value: &Value) -> Value {
    preview_at(value, PREVIEW_DEPTH)
}

fn preview_at(value: &Value, depth: usize) -> Value {
    match value {
        Value::String(s) if s.chars().count() > PREVIEW_TEXT => {
            let cut: String = s.chars().take(PREVIEW_TEXT).collect();
            Value::String(format!("{cut}..."))
        }
        Value::Array(items) if depth == 0 => Value::String(format!("[{} items]", items.len())),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .take(PREVIEW_ITEMS)
                .map(|item| preview_at(item, depth - 1))
                .collect(),
        ),
        Value::Object(_) if depth == 0 => Value::String("{...}".to_string()),
        Value::Object(map) => {
            let mut preview: Map<String, Value> = map
                .iter()
                .take(PREVIEW_KEYS)
                .map(|(key, item)| (key.clone(), preview_at(item, depth - 1)))
                .collect();
            if map.len() > PREVIEW_KEYS {
                preview.insert(
                    "...".to_string(),
                    Value::String(format!("+{} more", map.len() - PREVIEW_KEYS)),
                );
            }
            Value::Object(preview)
        }
        other => other.clone(),
    }
}

// ---------------------------------------------------------------------------
// Latest diff
// ---------------------------------------------------------------------------

/// Result of diffing an entity's two newest captures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LatestDiffOutcome {
    Diff(ExtractionDiff),
    /// Fewer than two completed captures exist.
    Insufficient {
        message: String,
        extraction_count: usize,
    },
}

impl LatestDiffOutcome {
    #[must_use]
    pub fn insufficient(entity_name: &str, schema_type: SchemaType, count: usize) -> Self {
        let message = if count == 0 {
            format!("No {schema_type} extractions found for {entity_name}")
        } else {
            format!(
                "Only one {schema_type} extraction exists for {entity_name}. Need at least 2 to diff."
            )
        };
        Self::Insufficient {
            message,
            extraction_count: count,
        }
    }
}

// ---------------------------------------------------------------------------
// Recent changes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChangeCounts {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EntityChange {
    pub entity_id: String,
    pub entity_name: String,
    pub schema_type: SchemaType,
    pub change_count: usize,
    pub latest_change: DateTime<Utc>,
    pub change_types: ChangeCounts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RecentChangesSummary {
    /// Distinct `(entity, schema type)` groups captured in the window.
    pub entities_checked: usize,
    pub entities_with_changes: usize,
    pub total_changes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RecentChanges {
    pub entities_with_changes: Vec<EntityChange>,
    pub summary: RecentChangesSummary,
}

/// Diff the two newest captures of every `(entity, schema type)` group.
///
/// `records` should already be limited to completed captures in the window.
///
/// # Errors
///
/// Propagates [`AnalysisError::DepthExceeded`] from the differ.
pub fn recent_changes(
    records: &[ExtractionRecord],
    options: &DiffOptions,
) -> Result<RecentChanges, AnalysisError> {
    let mut sorted = records.to_vec();
    sort_most_recent_first(&mut sorted);

    let mut groups: Vec<((&str, SchemaType), Vec<&ExtractionRecord>)> = Vec::new();
    for record in &sorted {
        let key = (record.entity_id.as_str(), record.schema_type);
        match groups.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, members)) => members.push(record),
            None => groups.push((key, vec![record])),
        }
    }

    let mut changed = Vec::new();
    for (_, members) in &groups {
        let [newest, previous, ..] = members.as_slice() else {
            continue;
        };
        let tree = diff_values(Some(&previous.data), Some(&newest.data), options)?;
        if !tree.has_changes {
            continue;
        }
        let count = |kind: ChangeType| tree.changes.iter().filter(|c| c.change_type == kind).count();
        changed.push(EntityChange {
            entity_id: newest.entity_id.clone(),
            entity_name: newest.entity_name.clone(),
            schema_type: newest.schema_type,
            change_count: tree.changes.len(),
            latest_change: newest.extracted_at,
            change_types: ChangeCounts {
                added: count(ChangeType::Added),
                removed: count(ChangeType::Removed),
                changed: count(ChangeType::Changed),
            },
        });
    }
    changed.sort_by(|a, b| b.change_count.cmp(&a.change_count));

    Ok(RecentChanges {
        summary: RecentChangesSummary {
            entities_checked: groups.len(),
            entities_with_changes: changed.len(),
            total_changes: changed.iter().map(|c| c.change_count).sum(),
        },
        entities_with_changes: changed,
    })
}
