use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `svy` binary.
#[derive(Debug, Parser)]
#[command(
    name = "svy",
    version,
    about = "Survey - diff, gap, and query tooling for extracted research data"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database file (overrides `database.path` and any remote database)
    #[arg(long, global = true)]
    pub db: Option<String>,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            db: self.db.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::{Cli, Commands, GlobalFlags, OutputFormat};
    use crate::cli::subcommands::{DiffCommands, QueryCommands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "svy", "--format", "table", "--limit", "10", "--verbose", "gaps", "prj-1",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Gaps(ref args) if args.project_id == "prj-1"));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["svy", "gaps", "prj-1", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["svy", "--format", "xml", "gaps", "prj-1"]).is_err());
    }

    #[test]
    fn db_flag_is_copied_into_global_flags() {
        let cli = Cli::try_parse_from(["svy", "--db", "/tmp/s.db", "project", "list"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.db.as_deref(), Some("/tmp/s.db"));
    }

    #[test]
    fn diff_latest_requires_schema() {
        assert!(Cli::try_parse_from(["svy", "diff", "latest", "ent-1"]).is_err());

        let cli = Cli::try_parse_from(["svy", "diff", "latest", "ent-1", "--schema", "pricing"])
            .expect("cli should parse");
        let Commands::Diff { action: DiffCommands::Latest { entity_id, schema } } = cli.command
        else {
            panic!("expected diff latest");
        };
        assert_eq!(entity_id, "ent-1");
        assert_eq!(schema, "pricing");
    }

    #[test]
    fn query_search_collects_repeated_filters() {
        let cli = Cli::try_parse_from([
            "svy", "query", "search", "--project", "prj-1", "--filter", "seats=>5", "--filter",
            "hasApi=true", "--text", "sso",
        ])
        .expect("cli should parse");
        let Commands::Query { action: QueryCommands::Search { filter, text, .. } } = cli.command
        else {
            panic!("expected query search");
        };
        assert_eq!(filter, vec!["seats=>5", "hasApi=true"]);
        assert_eq!(text.as_deref(), Some("sso"));
    }

    #[test]
    fn query_compare_takes_many_ids() {
        let cli = Cli::try_parse_from([
            "svy", "query", "compare", "--schema", "features", "ent-1", "ent-2",
        ])
        .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Query { action: QueryCommands::Compare { ref entity_ids, .. } }
                if entity_ids.len() == 2
        ));
    }
}
