use clap::Subcommand;

/// Entity subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum EntityCommands {
    /// Add an entity to a project
    Add {
        #[arg(long)]
        project: String,
        #[arg(long)]
        name: String,
        /// Free-form kind, e.g. `company` or `product`
        #[arg(long = "type")]
        entity_type: Option<String>,
        /// Primary URL; entities without one rank low for research
        #[arg(long)]
        url: Option<String>,
    },
    /// List a project's entities with their covered schema types
    List {
        #[arg(long)]
        project: String,
    },
    /// Show one entity
    Get {
        /// Entity ID
        id: String,
    },
}
