use schemars::{JsonSchema, Schema, schema_for};
use serde::Serialize;
use survey_analysis::diff::ExtractionDiff;
use survey_analysis::gaps::ResearchGapsReport;
use survey_analysis::history::{ExtractionHistory, LatestDiffOutcome, RecentChanges};
use survey_analysis::query::{EntityComparison, FieldValues, GenericQuery, QueryResults};
use survey_analysis::views::{
    CompanyView, ComplianceView, FeaturesView, IntegrationsView, PricingView,
};
use survey_core::entities::{Entity, EntityCoverage, ExtractionRecord, Project};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Output types with a published JSON Schema, by the name `svy schema` accepts.
const SCHEMA_NAMES: &[&str] = &[
    "project",
    "entity",
    "entity-coverage",
    "extraction",
    "diff",
    "latest-diff",
    "history",
    "recent-changes",
    "gaps",
    "generic-query",
    "query-results",
    "field-values",
    "comparison",
    "pricing",
    "compliance",
    "features",
    "integrations",
    "companies",
];

#[derive(Serialize)]
struct SchemaList {
    schemas: &'static [&'static str],
}

/// Handle `svy schema`. Runs without a database.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let name = args.type_name.trim().to_ascii_lowercase().replace('_', "-");
    if name == "list" {
        return output(
            &SchemaList {
                schemas: SCHEMA_NAMES,
            },
            flags.format,
        );
    }

    let schema = lookup(&name).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown schema type '{}'; expected one of: {}",
            args.type_name,
            SCHEMA_NAMES.join(", ")
        )
    })?;
    output(&schema, flags.format)
}

fn lookup(name: &str) -> Option<Schema> {
    let schema = match name {
        "project" => of::<Project>(),
        "entity" => of::<Entity>(),
        "entity-coverage" => of::<EntityCoverage>(),
        "extraction" => of::<ExtractionRecord>(),
        "diff" => of::<ExtractionDiff>(),
        "latest-diff" => of::<LatestDiffOutcome>(),
        "history" => of::<ExtractionHistory>(),
        "recent-changes" => of::<RecentChanges>(),
        "gaps" => of::<ResearchGapsReport>(),
        "generic-query" => of::<GenericQuery>(),
        "query-results" => of::<QueryResults>(),
        "field-values" => of::<FieldValues>(),
        "comparison" => of::<EntityComparison>(),
        "pricing" => of::<PricingView>(),
        "compliance" => of::<ComplianceView>(),
        "features" => of::<FeaturesView>(),
        "integrations" => of::<IntegrationsView>(),
        "companies" => of::<CompanyView>(),
        _ => return None,
    };
    Some(schema)
}

fn of<T: JsonSchema>() -> Schema {
    schema_for!(T)
}

#[cfg(test)]
mod tests {
    use super::{SCHEMA_NAMES, lookup};

    #[test]
    fn every_listed_name_resolves() {
        for name in SCHEMA_NAMES {
            assert!(lookup(name).is_some(), "no schema for {name}");
        }
    }

    #[test]
    fn gaps_schema_describes_report_fields() {
        let schema = lookup("gaps").expect("gaps schema");
        let json = serde_json::to_value(&schema).expect("schema serializes");
        let properties = json["properties"].as_object().expect("object schema");
        assert!(properties.contains_key("next_actions"));
        assert!(properties.contains_key("coverage_by_schema"));
    }

    #[test]
    fn unknown_name_is_none() {
        assert!(lookup("reviews").is_none());
    }
}
