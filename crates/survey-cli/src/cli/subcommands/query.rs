use clap::Subcommand;

/// Query subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum QueryCommands {
    /// Filter and text-search any schema's newest captures
    Search {
        #[arg(long)]
        project: String,
        #[arg(long)]
        schema: Option<String>,
        /// PATH=VALUE; VALUE may use >, >=, <, <=, !=null, contains:
        #[arg(long)]
        filter: Vec<String>,
        /// Case-insensitive text matched anywhere in the payload
        #[arg(long)]
        text: Option<String>,
    },
    /// Distinct values of one field across a project
    Values {
        #[arg(long)]
        project: String,
        #[arg(long)]
        schema: String,
        /// Dot path, e.g. `tiers.0.name`
        #[arg(long)]
        field: String,
    },
    /// Pricing view
    Pricing {
        #[arg(long)]
        project: String,
        #[arg(long)]
        free_tier: Option<bool>,
        #[arg(long)]
        enterprise: Option<bool>,
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long)]
        min_price: Option<f64>,
        /// name, price-asc, or price-desc
        #[arg(long, default_value = "name")]
        sort: String,
    },
    /// Compliance view
    Compliance {
        #[arg(long)]
        project: String,
        #[arg(long)]
        soc2: Option<bool>,
        #[arg(long)]
        fed_ramp: Option<String>,
        #[arg(long)]
        gdpr: Option<bool>,
        #[arg(long)]
        hipaa: Option<bool>,
        /// Held certification whose name contains this term
        #[arg(long)]
        certification: Option<String>,
    },
    /// Features view
    Features {
        #[arg(long)]
        project: String,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Integrations view
    Integrations {
        #[arg(long)]
        project: String,
        #[arg(long)]
        api: Option<bool>,
        #[arg(long)]
        sdk: Option<bool>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Company view
    Companies {
        #[arg(long)]
        project: String,
        #[arg(long)]
        min_founding: Option<i32>,
        #[arg(long)]
        max_founding: Option<i32>,
    },
    /// Newest captures of several entities side by side
    Compare {
        #[arg(long)]
        schema: String,
        /// Entity IDs, in display order
        #[arg(required = true)]
        entity_ids: Vec<String>,
    },
}
