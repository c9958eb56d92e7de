use anyhow::Context;
use survey_config::SurveyConfig;

use crate::cli::GlobalFlags;
use crate::context::find_project_root;

/// Load `.env`, then the layered config, then apply `--db`.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<SurveyConfig> {
    load_project_dotenv()?;

    let mut config = SurveyConfig::load().context("failed to load survey configuration")?;
    if let Some(path) = &flags.db {
        config.database.path.clone_from(path);
        config.database.url.clear();
        config.database.auth_token.clear();
    }
    tracing::debug!(
        db = %config.database.path,
        alignment = %config.analysis.array_alignment,
        "configuration loaded"
    );
    Ok(config)
}

/// Prefer the `.env` next to the enclosing `.survey` project, then the
/// current directory's.
fn load_project_dotenv() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;

    if let Some(root) = find_project_root(&cwd) {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenvy::from_path(&env_path)
                .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
            return Ok(());
        }
    }

    dotenvy::dotenv().ok();
    Ok(())
}
