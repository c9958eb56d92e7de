use clap::Subcommand;

/// Project subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProjectCommands {
    /// Create a project
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List projects, newest first
    List,
    /// Show one project
    Get {
        /// Project ID
        id: String,
    },
}
