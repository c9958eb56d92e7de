use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Project { action } => commands::project::handle(&action, ctx, flags).await,
        Commands::Entity { action } => commands::entity::handle(&action, ctx, flags).await,
        Commands::Extraction { action } => commands::extraction::handle(&action, ctx, flags).await,
        Commands::Diff { action } => commands::diff::handle(&action, ctx, flags).await,
        Commands::Gaps(args) => commands::gaps::handle(&args, ctx, flags).await,
        Commands::Query { action } => commands::query::handle(&action, ctx, flags).await,
        Commands::Schema(args) => commands::schema::handle(&args, flags),
    }
}
