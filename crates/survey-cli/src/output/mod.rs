use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => Ok(render_table(&serde_json::to_value(value)?)),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

/// Reports render as a key/value block for their scalar and nested-object
/// fields, then one titled section per list field.
fn render_table(value: &Value) -> String {
    match value {
        Value::Array(items) => render_list(items),
        Value::Object(map) => render_report(map),
        scalar => table::render_rows(&["value"], &[vec![cell(scalar)]], table_options()),
    }
}

fn render_report(map: &Map<String, Value>) -> String {
    let mut sections = Vec::new();

    let fields: Vec<Vec<String>> = map
        .iter()
        .filter(|(_, value)| !value.is_array())
        .map(|(key, value)| vec![key.clone(), cell(value)])
        .collect();
    if !fields.is_empty() {
        sections.push(table::render_rows(&["key", "value"], &fields, table_options()));
    }

    for (key, value) in map {
        if let Value::Array(items) = value {
            sections.push(format!("{key}:\n{}", render_list(items)));
        }
    }

    if sections.is_empty() {
        return String::from("(empty)");
    }
    sections.join("\n\n")
}

fn render_list(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    if !items.iter().all(Value::is_object) {
        let rows: Vec<Vec<String>> = items.iter().map(|item| vec![cell(item)]).collect();
        return table::render_rows(&["value"], &rows, table_options());
    }

    // Columns follow first-seen key order so `id`/`name` lead.
    let mut headers = Vec::<&str>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(&key.as_str()) {
                headers.push(key);
            }
        }
    }
    if headers.is_empty() {
        return String::from("(no columns)");
    }

    let rows: Vec<Vec<String>> = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(*header).map_or_else(|| String::from("-"), cell))
                .collect()
        })
        .collect();
    table::render_rows(&headers, &rows, table_options())
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}
