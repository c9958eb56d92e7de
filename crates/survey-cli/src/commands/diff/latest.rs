use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_schema;
use crate::context::AppContext;
use crate::output::output;

/// Prints a diff, or an `insufficient` outcome when fewer than two completed
/// captures exist.
pub async fn run(
    entity_id: &str,
    schema: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let schema_type = parse_schema(schema)?;
    let outcome = ctx.analyst.get_latest_diff(entity_id, schema_type).await?;
    output(&outcome, flags.format)
}
