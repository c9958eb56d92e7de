use serde::Serialize;
use survey_core::entities::Project;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProjectCommands;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct ProjectListResponse {
    projects: Vec<Project>,
    total: usize,
}

/// Handle `svy project`.
pub async fn handle(
    action: &ProjectCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ProjectCommands::Create { name, description } => {
            let project = ctx.db().create_project(name, description.as_deref()).await?;
            output(&project, flags.format)
        }
        ProjectCommands::List => {
            let limit = effective_limit(None, flags.limit, ctx.config.general.default_limit);
            let projects = ctx.db().list_projects(limit).await?;
            output(
                &ProjectListResponse {
                    total: projects.len(),
                    projects,
                },
                flags.format,
            )
        }
        ProjectCommands::Get { id } => output(&ctx.db().get_project(id).await?, flags.format),
    }
}
