use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_schema;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    entity_id: &str,
    schema: &str,
    max: Option<u32>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let schema_type = parse_schema(schema)?;
    let limit = effective_limit(max, flags.limit, ctx.config.analysis.history_limit);
    let history = ctx
        .analyst
        .get_extraction_history(entity_id, schema_type, Some(limit))
        .await?;
    output(&history, flags.format)
}
