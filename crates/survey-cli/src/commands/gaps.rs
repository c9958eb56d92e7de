use crate::cli::GlobalFlags;
use crate::cli::root_commands::GapsArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `svy gaps`. Prints `null` for an unknown project.
pub async fn handle(args: &GapsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = ctx.analyst.get_research_gaps(&args.project_id).await?;
    if let Some(report) = &report {
        tracing::debug!(
            entities = report.summary.total_entities,
            high = report.priorities.high.len(),
            "research gaps computed"
        );
    }
    output(&report, flags.format)
}
