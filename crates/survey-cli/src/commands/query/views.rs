use survey_analysis::views::{
    CompanyQuery, ComplianceQuery, FeaturesQuery, IntegrationsQuery, PricingQuery, PricingSort,
};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::QueryCommands;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Run one of the schema-specialized views.
pub async fn run(
    action: &QueryCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let analyst = &ctx.analyst;
    match action {
        QueryCommands::Pricing {
            project,
            free_tier,
            enterprise,
            max_price,
            min_price,
            sort,
        } => {
            let query = PricingQuery {
                project_id: project.clone(),
                has_free_tier: *free_tier,
                has_enterprise: *enterprise,
                max_price: *max_price,
                min_price: *min_price,
                sort_by: parse_enum::<PricingSort>(sort, "sort")?,
            };
            output(&analyst.query_pricing(&query).await?, flags.format)
        }
        QueryCommands::Compliance {
            project,
            soc2,
            fed_ramp,
            gdpr,
            hipaa,
            certification,
        } => {
            let query = ComplianceQuery {
                project_id: project.clone(),
                soc2: *soc2,
                fed_ramp_status: fed_ramp.clone(),
                gdpr_compliant: *gdpr,
                hipaa_compliant: *hipaa,
                has_certification: certification.clone(),
            };
            output(&analyst.query_compliance(&query).await?, flags.format)
        }
        QueryCommands::Features {
            project,
            search,
            category,
        } => {
            let query = FeaturesQuery {
                project_id: project.clone(),
                search_term: search.clone(),
                category: category.clone(),
            };
            output(&analyst.query_features(&query).await?, flags.format)
        }
        QueryCommands::Integrations {
            project,
            api,
            sdk,
            search,
        } => {
            let query = IntegrationsQuery {
                project_id: project.clone(),
                has_api: *api,
                has_sdk: *sdk,
                search_term: search.clone(),
            };
            output(&analyst.query_integrations(&query).await?, flags.format)
        }
        QueryCommands::Companies {
            project,
            min_founding,
            max_founding,
        } => {
            let query = CompanyQuery {
                project_id: project.clone(),
                min_founding: *min_founding,
                max_founding: *max_founding,
            };
            output(&analyst.query_companies(&query).await?, flags.format)
        }
        QueryCommands::Search { .. } | QueryCommands::Values { .. } | QueryCommands::Compare { .. } => {
            anyhow::bail!("not a schema view")
        }
    }
}
