use std::io::Read;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde_json::Value;
use survey_core::enums::ExtractionStatus;
use survey_db::repos::NewExtraction;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ExtractionCommands;
use crate::commands::shared::parse::{parse_enum, parse_schema};
use crate::context::AppContext;
use crate::output::output;

/// Handle `svy extraction`.
pub async fn handle(
    action: &ExtractionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ExtractionCommands::Add {
            entity,
            schema,
            file,
            source_url,
            status,
            confidence,
            screenshot,
            extracted_at,
        } => {
            let new = NewExtraction {
                entity_id: entity.clone(),
                schema_type: parse_schema(schema)?,
                data: read_payload(file)?,
                source_url: source_url.clone(),
                status: parse_enum::<ExtractionStatus>(status, "status")?,
                confidence: *confidence,
                screenshot_path: screenshot.clone(),
                extracted_at: extracted_at.as_deref().map(parse_timestamp).transpose()?,
            };
            let record = ctx.db().create_extraction(new).await?;
            tracing::debug!(extraction_id = %record.id, schema = %record.schema_type, "stored extraction");
            output(&record, flags.format)
        }
        ExtractionCommands::Get { id } => {
            output(&ctx.db().get_extraction(id).await?, flags.format)
        }
    }
}

fn read_payload(file: &str) -> anyhow::Result<Value> {
    let raw = if file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read payload from stdin")?;
        buf
    } else {
        std::fs::read_to_string(file).with_context(|| format!("failed to read payload {file}"))?
    };
    serde_json::from_str(&raw).with_context(|| format!("payload {file} is not valid JSON"))
}

fn parse_timestamp(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("invalid --extracted-at '{raw}': expected RFC 3339"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{parse_timestamp, read_payload};

    #[test]
    fn reads_payload_file() {
        let dir = tempfile::tempdir().expect("tempdir should create");
        let path = dir.path().join("pricing.json");
        std::fs::write(&path, r#"{"hasFreeTier": true}"#).expect("payload should write");

        let value = read_payload(&path.display().to_string()).expect("payload should parse");
        assert_eq!(value, json!({ "hasFreeTier": true }));
    }

    #[test]
    fn rejects_invalid_json() {
        let dir = tempfile::tempdir().expect("tempdir should create");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").expect("payload should write");

        let err = read_payload(&path.display().to_string()).expect_err("should fail");
        assert!(err.to_string().contains("is not valid JSON"));
    }

    #[test]
    fn timestamps_normalize_to_utc() {
        let ts = parse_timestamp("2026-03-01T12:00:00+02:00").expect("timestamp");
        assert_eq!(ts.to_rfc3339(), "2026-03-01T10:00:00+00:00");
        assert!(parse_timestamp("yesterday").is_err());
    }
}
