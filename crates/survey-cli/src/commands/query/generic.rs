use survey_analysis::query::GenericQuery;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::{parse_filter, parse_optional_schema, parse_schema};
use crate::context::AppContext;
use crate::output::output;

pub async fn search(
    project_id: &str,
    schema: Option<&str>,
    filters: &[String],
    text: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let query = GenericQuery {
        project_id: project_id.to_string(),
        schema_type: parse_optional_schema(schema)?,
        filters: filters
            .iter()
            .map(String::as_str)
            .map(parse_filter)
            .collect::<anyhow::Result<_>>()?,
        search_text: text.map(String::from),
        limit: flags.limit.map(|limit| limit as usize),
    };
    let results = ctx.analyst.query_extractions(&query).await?;
    output(&results, flags.format)
}

pub async fn values(
    project_id: &str,
    schema: &str,
    field: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let schema_type = parse_schema(schema)?;
    let values = ctx
        .analyst
        .get_field_values(project_id, schema_type, field)
        .await?;
    output(&values, flags.format)
}

pub async fn compare(
    schema: &str,
    entity_ids: &[String],
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let schema_type = parse_schema(schema)?;
    let comparison = ctx.analyst.compare_entities(entity_ids, schema_type).await?;
    output(&comparison, flags.format)
}
