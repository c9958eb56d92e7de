use crate::cli::GlobalFlags;
use crate::cli::subcommands::QueryCommands;
use crate::context::AppContext;

mod generic;
mod views;

/// Handle `svy query`.
pub async fn handle(
    action: &QueryCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        QueryCommands::Search {
            project,
            schema,
            filter,
            text,
        } => generic::search(project, schema.as_deref(), filter, text.as_deref(), ctx, flags).await,
        QueryCommands::Values {
            project,
            schema,
            field,
        } => generic::values(project, schema, field, ctx, flags).await,
        QueryCommands::Compare { schema, entity_ids } => {
            generic::compare(schema, entity_ids, ctx, flags).await
        }
        QueryCommands::Pricing { .. }
        | QueryCommands::Compliance { .. }
        | QueryCommands::Features { .. }
        | QueryCommands::Integrations { .. }
        | QueryCommands::Companies { .. } => views::run(action, ctx, flags).await,
    }
}
