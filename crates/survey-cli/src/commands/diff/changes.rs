use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_optional_schema;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    project_id: &str,
    schema: Option<&str>,
    days: Option<u32>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let schema_type = parse_optional_schema(schema)?;
    let changes = ctx
        .analyst
        .find_recent_changes(project_id, schema_type, days)
        .await?;
    output(&changes, flags.format)
}
