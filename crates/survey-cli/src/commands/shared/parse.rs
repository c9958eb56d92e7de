use anyhow::Context;
use serde::de::DeserializeOwned;
use serde_json::Value;
use survey_analysis::query::FieldFilter;
use survey_core::enums::SchemaType;

/// Parse a `snake_case` enum value through serde; hyphens are accepted.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().replace('-', "_");
    serde_json::from_value(Value::String(normalized))
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

pub fn parse_schema(raw: &str) -> anyhow::Result<SchemaType> {
    raw.parse::<SchemaType>().map_err(anyhow::Error::from)
}

pub fn parse_optional_schema(raw: Option<&str>) -> anyhow::Result<Option<SchemaType>> {
    raw.map(parse_schema).transpose()
}

/// Split `path=expected`. The expected side is read as JSON when it parses
/// (`true`, `12`, `"x"`, `[..]`) and as a plain string otherwise, so operator
/// strings like `>5` or `contains:sso` pass straight through.
pub fn parse_filter(raw: &str) -> anyhow::Result<FieldFilter> {
    let (path, expected) = raw
        .split_once('=')
        .with_context(|| format!("invalid filter '{raw}': expected PATH=VALUE"))?;
    let path = path.trim();
    if path.is_empty() {
        anyhow::bail!("invalid filter '{raw}': empty field path");
    }
    let expected = serde_json::from_str::<Value>(expected)
        .unwrap_or_else(|_| Value::String(expected.to_string()));
    Ok(FieldFilter::new(path, expected))
}
