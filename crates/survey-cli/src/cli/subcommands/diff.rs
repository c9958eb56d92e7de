use clap::Subcommand;

/// Diff subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum DiffCommands {
    /// Diff two extractions of the same schema type
    Compare {
        /// Older extraction ID
        old_id: String,
        /// Newer extraction ID
        new_id: String,
    },
    /// Diff an entity's two newest completed captures
    Latest {
        /// Entity ID
        entity_id: String,
        #[arg(long)]
        schema: String,
    },
    /// Capture timeline for one entity
    History {
        /// Entity ID
        entity_id: String,
        #[arg(long)]
        schema: String,
        /// Max captures (overrides the global --limit)
        #[arg(long = "max")]
        max: Option<u32>,
    },
    /// Entities whose data changed recently
    Changes {
        #[arg(long)]
        project: String,
        #[arg(long)]
        schema: Option<String>,
        /// Look-back window in days
        #[arg(long)]
        days: Option<u32>,
    },
}
