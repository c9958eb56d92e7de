use clap::Subcommand;

/// Extraction subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum ExtractionCommands {
    /// Store a JSON payload captured for an entity
    Add {
        #[arg(long)]
        entity: String,
        /// Schema type: pricing, features, company, compliance, integrations
        #[arg(long)]
        schema: String,
        /// Path to the JSON payload, or `-` for stdin
        #[arg(long)]
        file: String,
        /// Page the data came from (defaults to the entity URL)
        #[arg(long)]
        source_url: Option<String>,
        /// pending, completed, or failed
        #[arg(long, default_value = "completed")]
        status: String,
        #[arg(long)]
        confidence: Option<f64>,
        #[arg(long)]
        screenshot: Option<String>,
        /// Capture time as RFC 3339 (defaults to now)
        #[arg(long)]
        extracted_at: Option<String>,
    },
    /// Show one extraction with its full payload
    Get {
        /// Extraction ID
        id: String,
    },
}
