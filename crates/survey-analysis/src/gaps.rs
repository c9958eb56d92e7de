//! Research-gap report: per-entity missing schema types, coverage, and next actions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use survey_core::entities::{EntityCoverage, Project};
use survey_core::enums::{Priority, SchemaType};

/// Number of high-priority entity names listed in the research suggestion.
const SUGGESTED_ENTITIES: usize = 3;

/// Medium-priority entities missing at most this many types count as nearly done.
const NEARLY_COMPLETE_MISSING: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EntityGap {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
    pub entity_type: Option<String>,
    pub extraction_count: usize,
    pub missing_schemas: Vec<SchemaType>,
    pub existing_schemas: Vec<SchemaType>,
    pub has_url: bool,
    pub priority: Priority,
}

impl EntityGap {
    fn new(coverage: &EntityCoverage, schema_types: &[SchemaType]) -> Self {
        let mut existing: Vec<SchemaType> = Vec::with_capacity(coverage.schemas.len());
        for schema in &coverage.schemas {
            if !existing.contains(schema) {
                existing.push(*schema);
            }
        }
        let missing: Vec<SchemaType> = schema_types
            .iter()
            .filter(|schema| !existing.contains(schema))
            .copied()
            .collect();
        let has_url = coverage.entity.has_url();

        let priority = if !has_url {
            Priority::Low
        } else if existing.is_empty() {
            Priority::High
        } else if !missing.is_empty() {
            Priority::Medium
        } else {
            Priority::Low
        };

        Self {
            id: coverage.entity.id.clone(),
            name: coverage.entity.name.clone(),
            url: coverage.entity.url.clone(),
            entity_type: coverage.entity.entity_type.clone(),
            extraction_count: existing.len(),
            missing_schemas: missing,
            existing_schemas: existing,
            has_url,
            priority,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaTypeCoverage {
    pub schema_type: SchemaType,
    pub entities_with_extraction: usize,
    pub entities_without_extraction: usize,
    /// Whole percent of all entities, URL or not.
    pub coverage_percent: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GapSummary {
    pub total_entities: usize,
    pub entities_with_url: usize,
    pub entities_with_no_extractions: usize,
    pub entities_fully_covered: usize,
    pub average_extraction_count: f64,
    pub total_extractions: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PriorityGroups {
    pub high: Vec<EntityGap>,
    pub medium: Vec<EntityGap>,
    pub low: Vec<EntityGap>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResearchGapsReport {
    pub project: ProjectRef,
    pub summary: GapSummary,
    /// One row per configured schema type, in configured order.
    pub coverage_by_schema: Vec<SchemaTypeCoverage>,
    pub entity_gaps: Vec<EntityGap>,
    pub priorities: PriorityGroups,
    pub next_actions: Vec<String>,
}

/// Build the gap report for `project` from its entities' completed coverage.
///
/// `entities` is expected in name order; that order breaks ties within a
/// priority and extraction count.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_gaps(
    project: &Project,
    entities: &[EntityCoverage],
    schema_types: &[SchemaType],
) -> ResearchGapsReport {
    let mut gaps: Vec<EntityGap> = entities
        .iter()
        .map(|coverage| EntityGap::new(coverage, schema_types))
        .collect();
    gaps.sort_by_key(|gap| (gap.priority.rank(), gap.extraction_count));

    let total = gaps.len();
    let coverage_by_schema: Vec<SchemaTypeCoverage> = schema_types
        .iter()
        .map(|&schema_type| {
            let with = gaps
                .iter()
                .filter(|gap| gap.existing_schemas.contains(&schema_type))
                .count();
            SchemaTypeCoverage {
                schema_type,
                entities_with_extraction: with,
                entities_without_extraction: total - with,
                coverage_percent: percent(with, total),
            }
        })
        .collect();

    let total_extractions: usize = gaps.iter().map(|gap| gap.extraction_count).sum();
    let summary = GapSummary {
        total_entities: total,
        entities_with_url: gaps.iter().filter(|gap| gap.has_url).count(),
        entities_with_no_extractions: gaps.iter().filter(|gap| gap.extraction_count == 0).count(),
        entities_fully_covered: gaps.iter().filter(|gap| gap.missing_schemas.is_empty()).count(),
        average_extraction_count: if total == 0 {
            0.0
        } else {
            (total_extractions as f64 / total as f64 * 10.0).round() / 10.0
        },
        total_extractions,
    };

    let by_priority = |priority: Priority| -> Vec<EntityGap> {
        gaps.iter()
            .filter(|gap| gap.priority == priority)
            .cloned()
            .collect()
    };
    let priorities = PriorityGroups {
        high: by_priority(Priority::High),
        medium: by_priority(Priority::Medium),
        low: by_priority(Priority::Low),
    };

    let next_actions = next_actions(&coverage_by_schema, &gaps, &priorities);

    ResearchGapsReport {
        project: ProjectRef {
            id: project.id.clone(),
            name: project.name.clone(),
        },
        summary,
        coverage_by_schema,
        entity_gaps: gaps,
        priorities,
        next_actions,
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}

fn next_actions(
    coverage: &[SchemaTypeCoverage],
    gaps: &[EntityGap],
    priorities: &PriorityGroups,
) -> Vec<String> {
    let mut actions = Vec::new();

    // min_by_key keeps the first of equal minima.
    let lowest = coverage.iter().min_by_key(|c| c.coverage_percent);
    if let Some(lowest) = lowest.filter(|c| c.coverage_percent < 100) {
        actions.push(format!(
            "Extract {} data ({}% coverage, {} entities missing)",
            lowest.schema_type, lowest.coverage_percent, lowest.entities_without_extraction
        ));
    }

    if !priorities.high.is_empty() {
        let names: Vec<&str> = priorities
            .high
            .iter()
            .take(SUGGESTED_ENTITIES)
            .map(|gap| gap.name.as_str())
            .collect();
        actions.push(format!(
            "Research high-priority entities with URLs but no extractions: {}",
            names.join(", ")
        ));
    }

    let without_url = gaps.iter().filter(|gap| !gap.has_url).count();
    if without_url > 0 {
        actions.push(format!("Add URLs to {without_url} entities before extraction"));
    }

    let nearly_complete = priorities
        .medium
        .iter()
        .filter(|gap| gap.missing_schemas.len() <= NEARLY_COMPLETE_MISSING)
        .count();
    if nearly_complete > 0 {
        actions.push(format!(
            "Complete {nearly_complete} entities that are nearly fully researched"
        ));
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use survey_core::entities::Entity;

    fn project() -> Project {
        Project {
            id: "proj-1".into(),
            name: "AI Coding Tools".into(),
            description: None,
            created_at: Utc::now(),
        }
    }

    fn coverage(name: &str, url: Option<&str>, schemas: &[SchemaType]) -> EntityCoverage {
        EntityCoverage {
            entity: Entity {
                id: format!("ent-{name}"),
                project_id: "proj-1".into(),
                name: name.into(),
                entity_type: Some("product".into()),
                url: url.map(str::to_string),
                created_at: Utc::now(),
            },
            schemas: schemas.to_vec(),
        }
    }

    const URL: Option<&str> = Some("https://example.com");

    #[test]
    fn priority_rules() {
        let entities = vec![
            coverage("Alpha", None, &[SchemaType::Pricing]),
            coverage("Beta", URL, &[]),
            coverage("Gamma", URL, &[SchemaType::Pricing]),
            coverage("Delta", URL, &SchemaType::ALL),
            coverage("Empty", Some("  "), &[]),
        ];
        let report = compute_gaps(&project(), &entities, &SchemaType::ALL);

        let order: Vec<(&str, Priority)> = report
            .entity_gaps
            .iter()
            .map(|gap| (gap.name.as_str(), gap.priority))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Beta", Priority::High),
                ("Gamma", Priority::Medium),
                ("Empty", Priority::Low),
                ("Alpha", Priority::Low),
                ("Delta", Priority::Low),
            ]
        );
        assert_eq!(report.priorities.high.len(), 1);
        assert_eq!(report.priorities.low.len(), 3);
        assert!(!report.entity_gaps[2].has_url);
    }

    #[test]
    fn coverage_counts_entities_without_url() {
        let entities = vec![
            coverage("A", URL, &[SchemaType::Pricing]),
            coverage("B", URL, &[]),
            coverage("C", None, &[]),
            coverage("D", URL, &[]),
        ];
        let report = compute_gaps(&project(), &entities, &SchemaType::ALL);

        let pricing = report.coverage_by_schema[0];
        assert_eq!(pricing.schema_type, SchemaType::Pricing);
        assert_eq!(pricing.coverage_percent, 25);
        assert_eq!(pricing.entities_without_extraction, 3);
        assert_eq!(report.coverage_by_schema[1].coverage_percent, 0);

        assert_eq!(report.summary.total_extractions, 1);
        assert!((report.summary.average_extraction_count - 0.3).abs() < f64::EPSILON);
        assert_eq!(report.summary.entities_with_no_extractions, 3);
        assert_eq!(report.summary.entities_with_url, 3);
    }

    #[test]
    fn next_actions_in_fixed_order() {
        let entities = vec![
            coverage("A", URL, &[SchemaType::Pricing, SchemaType::Features, SchemaType::Company]),
            coverage("B", URL, &[]),
            coverage("C", URL, &[]),
            coverage("D", URL, &[]),
            coverage("E", URL, &[]),
            coverage("F", None, &[]),
        ];
        let report = compute_gaps(&project(), &entities, &SchemaType::ALL);

        assert_eq!(
            report.next_actions,
            vec![
                "Extract compliance data (0% coverage, 6 entities missing)".to_string(),
                "Research high-priority entities with URLs but no extractions: B, C, D".to_string(),
                "Add URLs to 1 entities before extraction".to_string(),
                "Complete 1 entities that are nearly fully researched".to_string(),
            ]
        );
    }

    #[test]
    fn fully_covered_project_needs_nothing() {
        let entities = vec![coverage("A", URL, &SchemaType::ALL)];
        let report = compute_gaps(&project(), &entities, &SchemaType::ALL);
        assert!(report.next_actions.is_empty());
        assert_eq!(report.summary.entities_fully_covered, 1);
    }

    #[test]
    fn empty_project_reports_zero_coverage() {
        let report = compute_gaps(&project(), &[], &SchemaType::ALL);
        assert_eq!(report.summary.total_entities, 0);
        assert!(report.summary.average_extraction_count.abs() < f64::EPSILON);
        assert_eq!(
            report.next_actions,
            vec!["Extract pricing data (0% coverage, 0 entities missing)".to_string()]
        );
    }

    #[test]
    fn configured_schema_subset_limits_missing() {
        let entities = vec![coverage("A", URL, &[SchemaType::Pricing])];
        let report = compute_gaps(&project(), &entities, &[SchemaType::Pricing]);
        assert!(report.entity_gaps[0].missing_schemas.is_empty());
        assert_eq!(report.entity_gaps[0].priority, Priority::Low);
        assert_eq!(report.coverage_by_schema.len(), 1);
    }
}
