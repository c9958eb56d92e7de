use clap::{Args, Subcommand};

use super::subcommands::{
    DiffCommands, EntityCommands, ExtractionCommands, ProjectCommands, QueryCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Research projects
    Project {
        #[command(subcommand)]
        action: ProjectCommands,
    },
    /// Entities tracked inside a project
    Entity {
        #[command(subcommand)]
        action: EntityCommands,
    },
    /// Ingest extracted payloads
    Extraction {
        #[command(subcommand)]
        action: ExtractionCommands,
    },
    /// Compare captures and follow change over time
    Diff {
        #[command(subcommand)]
        action: DiffCommands,
    },
    /// Coverage report and what to research next
    Gaps(GapsArgs),
    /// Query the newest captures across a project
    Query {
        #[command(subcommand)]
        action: QueryCommands,
    },
    /// Print the JSON Schema of a command's output
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct GapsArgs {
    /// Project ID
    pub project_id: String,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Output type name (see `svy schema list`)
    pub type_name: String,
}
