use crate::cli::GlobalFlags;
use crate::cli::subcommands::DiffCommands;
use crate::context::AppContext;

mod changes;
mod compare;
mod history;
mod latest;

/// Handle `svy diff`.
pub async fn handle(
    action: &DiffCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        DiffCommands::Compare { old_id, new_id } => compare::run(old_id, new_id, ctx, flags).await,
        DiffCommands::Latest { entity_id, schema } => {
            latest::run(entity_id, schema, ctx, flags).await
        }
        DiffCommands::History {
            entity_id,
            schema,
            max,
        } => history::run(entity_id, schema, *max, ctx, flags).await,
        DiffCommands::Changes {
            project,
            schema,
            days,
        } => changes::run(project, schema.as_deref(), *days, ctx, flags).await,
    }
}
