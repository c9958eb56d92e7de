use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Prints `null` when either extraction is unknown.
pub async fn run(
    old_id: &str,
    new_id: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let diff = ctx.analyst.diff_extractions(old_id, new_id).await?;
    output(&diff, flags.format)
}
