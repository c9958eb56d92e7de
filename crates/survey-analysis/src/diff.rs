//! Path-level tree diff between two extraction payloads.
//!
//! The walk uses an explicit work stack so payload depth is bounded by
//! [`DiffOptions::max_depth`] rather than the call stack. Changes come out in
//! depth-first order: for objects, keys of the new payload in order, then keys
//! only the old payload had.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use survey_core::entities::ExtractionRecord;
use survey_core::enums::{ArrayAlignment, SchemaType};

use crate::error::AnalysisError;
use crate::value::{display_path, index_path, key_path, values_equal};

/// Fields tried, in order, when aligning arrays of objects by key.
const MATCH_KEYS: [&str; 5] = ["name", "id", "key", "title", "type"];

/// Share of distinct values a candidate key needs across both arrays.
const MIN_KEY_UNIQUENESS: f64 = 0.8;

const MAX_SUMMARY_TEXT: usize = 50;

const DAY_MS: i64 = 86_400_000;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Added,
    Removed,
    Changed,
}

impl ChangeType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Changed => "changed",
        }
    }
}

/// One path-level difference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiffChange {
    pub path: String,
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

impl DiffChange {
    fn added(path: String, value: &Value) -> Self {
        Self {
            path: display_path(path),
            change_type: ChangeType::Added,
            old_value: None,
            new_value: Some(value.clone()),
        }
    }

    fn removed(path: String, value: &Value) -> Self {
        Self {
            path: display_path(path),
            change_type: ChangeType::Removed,
            old_value: Some(value.clone()),
            new_value: None,
        }
    }

    fn changed(path: String, old: &Value, new: &Value) -> Self {
        Self {
            path: display_path(path),
            change_type: ChangeType::Changed,
            old_value: Some(old.clone()),
            new_value: Some(new.clone()),
        }
    }
}

/// Change counts by type. `total` is always the sum of the other three.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
    pub total: usize,
}

impl DiffSummary {
    #[must_use]
    pub fn of(changes: &[DiffChange]) -> Self {
        let count = |kind: ChangeType| changes.iter().filter(|c| c.change_type == kind).count();
        Self {
            added: count(ChangeType::Added),
            removed: count(ChangeType::Removed),
            changed: count(ChangeType::Changed),
            total: changes.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TreeDiff {
    pub changes: Vec<DiffChange>,
    pub summary: DiffSummary,
    pub has_changes: bool,
}

impl TreeDiff {
    fn from_changes(changes: Vec<DiffChange>) -> Self {
        Self {
            summary: DiffSummary::of(&changes),
            has_changes: !changes.is_empty(),
            changes,
        }
    }
}

/// Identity of one side of an extraction diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExtractionRef {
    pub id: String,
    pub extracted_at: DateTime<Utc>,
    pub source_url: String,
}

impl From<&ExtractionRecord> for ExtractionRef {
    fn from(record: &ExtractionRecord) -> Self {
        Self {
            id: record.id.clone(),
            extracted_at: record.extracted_at,
            source_url: record.source_url.clone(),
        }
    }
}

/// Diff between two captures of the same schema type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExtractionDiff {
    pub entity_id: String,
    pub entity_name: String,
    pub schema_type: SchemaType,
    pub has_changes: bool,
    pub changes: Vec<DiffChange>,
    pub summary: DiffSummary,
    pub old_extraction: ExtractionRef,
    pub new_extraction: ExtractionRef,
    pub days_between: i64,
}

// ---------------------------------------------------------------------------
// Differ
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOptions {
    pub array_alignment: ArrayAlignment,
    /// Deepest container nesting the walk will descend into.
    pub max_depth: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            array_alignment: ArrayAlignment::Index,
            max_depth: 64,
        }
    }
}

enum Step<'a> {
    Compare {
        path: String,
        old: Option<&'a Value>,
        new: Option<&'a Value>,
        depth: usize,
    },
    Emit(DiffChange),
}

/// Compare two payloads. `None` and JSON `null` are both treated as absent.
///
/// # Errors
///
/// Returns [`AnalysisError::DepthExceeded`] when either payload nests deeper
/// than `options.max_depth`.
pub fn diff_values(
    old: Option<&Value>,
    new: Option<&Value>,
    options: &DiffOptions,
) -> Result<TreeDiff, AnalysisError> {
    let mut changes = Vec::new();
    let mut stack = vec![Step::Compare {
        path: String::new(),
        old,
        new,
        depth: 0,
    }];

    while let Some(step) = stack.pop() {
        let (path, old, new, depth) = match step {
            Step::Emit(change) => {
                changes.push(change);
                continue;
            }
            Step::Compare {
                path,
                old,
                new,
                depth,
            } => (path, present(old), present(new), depth),
        };

        match (old, new) {
            (None, None) => {}
            (None, Some(new)) => changes.push(DiffChange::added(path, new)),
            (Some(old), None) => changes.push(DiffChange::removed(path, old)),
            (Some(Value::Object(old_map)), Some(Value::Object(new_map))) => {
                check_depth(&path, depth, options)?;
                let mut steps = Vec::with_capacity(new_map.len());
                for (key, new_value) in new_map {
                    let child = key_path(&path, key);
                    steps.push(match old_map.get(key) {
                        Some(old_value) => Step::Compare {
                            path: child,
                            old: Some(old_value),
                            new: Some(new_value),
                            depth: depth + 1,
                        },
                        None => Step::Emit(DiffChange::added(child, new_value)),
                    });
                }
                for (key, old_value) in old_map {
                    if !new_map.contains_key(key) {
                        steps.push(Step::Emit(DiffChange::removed(key_path(&path, key), old_value)));
                    }
                }
                stack.extend(steps.into_iter().rev());
            }
            (Some(Value::Array(old_items)), Some(Value::Array(new_items))) => {
                check_depth(&path, depth, options)?;
                let key = match options.array_alignment {
                    ArrayAlignment::Keyed => find_match_key(old_items, new_items),
                    ArrayAlignment::Index => None,
                };
                let steps = match key {
                    Some(key) => keyed_steps(&path, key, old_items, new_items, depth),
                    None => index_steps(&path, old_items, new_items, depth),
                };
                stack.extend(steps.into_iter().rev());
            }
            (Some(old), Some(new)) => {
                if !values_equal(old, new) {
                    changes.push(DiffChange::changed(path, old, new));
                }
            }
        }
    }

    Ok(TreeDiff::from_changes(changes))
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn check_depth(path: &str, depth: usize, options: &DiffOptions) -> Result<(), AnalysisError> {
    if depth >= options.max_depth {
        return Err(AnalysisError::DepthExceeded {
            path: display_path(path.to_string()),
            max_depth: options.max_depth,
        });
    }
    Ok(())
}

fn index_steps<'a>(
    path: &str,
    old_items: &'a [Value],
    new_items: &'a [Value],
    depth: usize,
) -> Vec<Step<'a>> {
    let len = old_items.len().max(new_items.len());
    (0..len)
        .map(|idx| {
            let child = index_path(path, idx);
            match (old_items.get(idx), new_items.get(idx)) {
                (Some(old), Some(new)) => Step::Compare {
                    path: child,
                    old: Some(old),
                    new: Some(new),
                    depth: depth + 1,
                },
                (None, Some(new)) => Step::Emit(DiffChange::added(child, new)),
                (Some(old), None) => Step::Emit(DiffChange::removed(child, old)),
                (None, None) => unreachable!("index below the longer length"),
            }
        })
        .collect()
}

/// Old-only items first (removed), then new items in order (added or compared).
fn keyed_steps<'a>(
    path: &str,
    key: &str,
    old_items: &'a [Value],
    new_items: &'a [Value],
    depth: usize,
) -> Vec<Step<'a>> {
    let old_by_key = index_by_key(old_items, key);
    let new_by_key = index_by_key(new_items, key);
    let item_path = |label: &str| format!("{path}[{key}={label}]");
    let find = |entries: &[(String, &'a Value)], label: &str| {
        entries
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, item)| *item)
    };

    let mut steps = Vec::new();
    for (label, old) in &old_by_key {
        if find(&new_by_key, label).is_none() {
            steps.push(Step::Emit(DiffChange::removed(item_path(label), old)));
        }
    }
    for (label, new) in &new_by_key {
        match find(&old_by_key, label) {
            Some(old) => steps.push(Step::Compare {
                path: item_path(label),
                old: Some(old),
                new: Some(new),
                depth: depth + 1,
            }),
            None => steps.push(Step::Emit(DiffChange::added(item_path(label), new))),
        }
    }
    steps
}

/// Items labelled by their key value. A repeated label keeps its first
/// position and its last item.
fn index_by_key<'a>(items: &'a [Value], key: &str) -> Vec<(String, &'a Value)> {
    let mut entries: Vec<(String, &'a Value)> = Vec::new();
    for item in items {
        let label = item.get(key).map_or_else(|| "null".to_string(), key_label);
        match entries.iter_mut().find(|(existing, _)| *existing == label) {
            Some(entry) => entry.1 = item,
            None => entries.push((label, item)),
        }
    }
    entries
}

fn key_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Pick the identifying field for keyed alignment, if any qualifies.
///
/// The candidate must exist on the first element (of the old array, or the
/// new one when old is empty) and have mostly distinct values across both.
#[allow(clippy::cast_precision_loss)]
fn find_match_key(old_items: &[Value], new_items: &[Value]) -> Option<&'static str> {
    let sample = old_items.first().or_else(|| new_items.first())?.as_object()?;

    MATCH_KEYS.into_iter().find(|key| {
        if !sample.contains_key(*key) {
            return false;
        }
        let values: Vec<&Value> = old_items
            .iter()
            .chain(new_items)
            .filter_map(|item| item.get(*key))
            .collect();
        let mut distinct: Vec<&Value> = Vec::new();
        for value in &values {
            if !distinct.contains(value) {
                distinct.push(value);
            }
        }
        !values.is_empty() && distinct.len() as f64 >= values.len() as f64 * MIN_KEY_UNIQUENESS
    })
}

/// Diff two extraction records of the same schema type.
///
/// # Errors
///
/// Returns [`AnalysisError::SchemaMismatch`] when the schema types differ, or
/// [`AnalysisError::DepthExceeded`] from the payload walk.
pub fn diff_extractions(
    old: &ExtractionRecord,
    new: &ExtractionRecord,
    options: &DiffOptions,
) -> Result<ExtractionDiff, AnalysisError> {
    if old.schema_type != new.schema_type {
        return Err(AnalysisError::SchemaMismatch {
            old: old.schema_type,
            new: new.schema_type,
        });
    }

    let tree = diff_values(Some(&old.data), Some(&new.data), options)?;
    Ok(ExtractionDiff {
        entity_id: new.entity_id.clone(),
        entity_name: new.entity_name.clone(),
        schema_type: new.schema_type,
        has_changes: tree.has_changes,
        changes: tree.changes,
        summary: tree.summary,
        old_extraction: ExtractionRef::from(old),
        new_extraction: ExtractionRef::from(new),
        days_between: days_between(old.extracted_at, new.extracted_at),
    })
}

// ---------------------------------------------------------------------------
// Presentation helpers
// ---------------------------------------------------------------------------

/// Whole days between two instants, rounded half up, regardless of order.
#[must_use]
pub fn days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    let ms = (b - a).num_milliseconds().abs();
    (ms + DAY_MS / 2) / DAY_MS
}

/// One human-readable sentence per change.
#[must_use]
pub fn summarize_changes(changes: &[DiffChange]) -> Vec<String> {
    changes
        .iter()
        .map(|change| {
            let old = format_value(change.old_value.as_ref());
            let new = format_value(change.new_value.as_ref());
            match change.change_type {
                ChangeType::Added => format!("Added {}: {new}", change.path),
                ChangeType::Removed => format!("Removed {}: {old}", change.path),
                ChangeType::Changed => format!("Changed {} from {old} to {new}", change.path),
            }
        })
        .collect()
}

/// Short display form: strings quoted and cut at 50 characters, containers
/// reduced to their size.
#[must_use]
pub fn format_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => {
            if s.chars().count() > MAX_SUMMARY_TEXT {
                let cut: String = s.chars().take(MAX_SUMMARY_TEXT).collect();
                format!("\"{cut}...\"")
            } else {
                format!("\"{s}\"")
            }
        }
        Some(Value::Array(items)) => format!("[{} items]", items.len()),
        Some(Value::Object(map)) => format!("{{{} fields}}", map.len()),
        Some(other) => other.to_string(),
    }
}
