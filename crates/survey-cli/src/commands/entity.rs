use serde::Serialize;
use survey_core::enums::SchemaType;
use survey_core::store::ExtractionStore;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::EntityCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct EntityRow {
    id: String,
    name: String,
    entity_type: Option<String>,
    url: Option<String>,
    schemas: Vec<SchemaType>,
}

#[derive(Serialize)]
struct EntityListResponse {
    project_id: String,
    entities: Vec<EntityRow>,
    total: usize,
}

/// Handle `svy entity`.
pub async fn handle(
    action: &EntityCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        EntityCommands::Add {
            project,
            name,
            entity_type,
            url,
        } => {
            let entity = ctx
                .db()
                .create_entity(project, name, entity_type.as_deref(), url.as_deref())
                .await?;
            output(&entity, flags.format)
        }
        EntityCommands::List { project } => {
            let entities: Vec<EntityRow> = ctx
                .db()
                .list_entities(project)
                .await?
                .into_iter()
                .map(|coverage| EntityRow {
                    id: coverage.entity.id,
                    name: coverage.entity.name,
                    entity_type: coverage.entity.entity_type,
                    url: coverage.entity.url,
                    schemas: coverage.schemas,
                })
                .collect();
            output(
                &EntityListResponse {
                    project_id: project.clone(),
                    total: entities.len(),
                    entities,
                },
                flags.format,
            )
        }
        EntityCommands::Get { id } => output(&ctx.db().get_entity(id).await?, flags.format),
    }
}
