use std::path::Path;

use anyhow::Context;
use survey_analysis::Analyst;
use survey_config::{DatabaseConfig, SurveyConfig};
use survey_db::SurveyDb;

/// Long-lived handles shared by every command.
pub struct AppContext {
    pub config: SurveyConfig,
    pub analyst: Analyst<SurveyDb>,
}

impl AppContext {
    /// Open the configured database and wire the analyst over it.
    pub async fn init(config: SurveyConfig) -> anyhow::Result<Self> {
        ensure_local_parent(&config.database)?;

        let db = SurveyDb::open(&config.database)
            .await
            .with_context(|| describe(&config.database))?;
        tracing::debug!(
            remote = config.database.is_remote(),
            path = %config.database.path,
            "database opened"
        );

        let analyst = Analyst::new(db, config.analysis.clone());
        Ok(Self { config, analyst })
    }

    /// Write access for ingest commands.
    pub const fn db(&self) -> &SurveyDb {
        self.analyst.store()
    }
}

fn ensure_local_parent(config: &DatabaseConfig) -> anyhow::Result<()> {
    if config.is_remote() || config.is_in_memory() {
        return Ok(());
    }
    match Path::new(&config.path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create database directory {}", parent.display())),
        _ => Ok(()),
    }
}

fn describe(config: &DatabaseConfig) -> String {
    if config.is_remote() {
        format!("failed to open remote database at {}", config.url)
    } else {
        format!("failed to open database at {}", config.path)
    }
}

#[cfg(test)]
mod tests {
    use survey_config::{DatabaseConfig, SurveyConfig};
    use tempfile::TempDir;

    use super::{AppContext, ensure_local_parent};

    #[test]
    fn creates_missing_database_directory() {
        let temp = TempDir::new().expect("tempdir should create");
        let path = temp.path().join("nested/.survey/survey.db");
        let config = DatabaseConfig {
            path: path.display().to_string(),
            ..DatabaseConfig::default()
        };

        ensure_local_parent(&config).expect("parent should be created");
        assert!(temp.path().join("nested/.survey").is_dir());
    }

    #[tokio::test]
    async fn init_opens_in_memory_database() {
        let config = SurveyConfig {
            database: DatabaseConfig {
                path: ":memory:".into(),
                ..DatabaseConfig::default()
            },
            ..SurveyConfig::default()
        };

        let ctx = AppContext::init(config).await.expect("context should init");
        let projects = ctx.db().list_projects(10).await.expect("list projects");
        assert!(projects.is_empty());
    }
}
