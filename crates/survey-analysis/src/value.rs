//! Structured-value utilities over opaque JSON payloads.

use serde_json::Value;

/// Path reported when the payload itself (rather than a field) matches or changes.
pub const ROOT_PATH: &str = "root";

/// Look up a dot-separated path (`funding.totalRaised`) in a payload.
///
/// Only objects are traversed; arrays are not addressable. A present `null` at
/// the end of the path is returned as `Some(Value::Null)`.
#[must_use]
pub fn get_nested_value<'a>(payload: Option<&'a Value>, path: &str) -> Option<&'a Value> {
    let mut current = payload?;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Paths of every leaf whose text contains `text`, case-insensitively.
///
/// Strings, numbers, and booleans are matched; `null` never is. Paths use
/// `field.sub` for object keys and `field[2]` for array elements.
#[must_use]
pub fn search_in_object(payload: &Value, text: &str) -> Vec<String> {
    let needle = text.to_lowercase();
    let mut matches = Vec::new();
    let mut stack: Vec<(String, &Value)> = vec![(String::new(), payload)];

    while let Some((path, value)) = stack.pop() {
        let hit = match value {
            Value::Null => false,
            Value::String(s) => s.to_lowercase().contains(&needle),
            Value::Number(n) => n.to_string().contains(&needle),
            Value::Bool(b) => b.to_string().contains(&needle),
            Value::Array(items) => {
                for (idx, item) in items.iter().enumerate().rev() {
                    stack.push((index_path(&path, idx), item));
                }
                false
            }
            Value::Object(map) => {
                for (key, item) in map.iter().rev() {
                    stack.push((key_path(&path, key), item));
                }
                false
            }
        };
        if hit {
            matches.push(display_path(path));
        }
    }
    matches
}

pub(crate) fn key_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

pub(crate) fn index_path(parent: &str, idx: usize) -> String {
    format!("{parent}[{idx}]")
}

pub(crate) fn display_path(path: String) -> String {
    if path.is_empty() { ROOT_PATH.to_string() } else { path }
}

/// JSON equality that treats `15` and `15.0` as the same number.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Text form of a value for substring tests: strings bare, everything else as
/// compact JSON.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A parsed filter expectation.
///
/// String expectations may carry an operator: `>N`, `<N`, `>=N`, `<=N`,
/// `!=null`, `contains:S`. Anything else compares for equality.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Equals(Value),
    Greater(f64),
    GreaterOrEqual(f64),
    Less(f64),
    LessOrEqual(f64),
    NotNull,
    /// Lowercased needle.
    Contains(String),
    /// An operator with an unparseable operand; matches nothing.
    Never,
}

impl Predicate {
    /// Parse an expected value. Never fails: malformed operands become [`Predicate::Never`].
    #[must_use]
    pub fn parse(expected: &Value) -> Self {
        let Value::String(text) = expected else {
            return Self::Equals(expected.clone());
        };

        if text == "!=null" {
            return Self::NotNull;
        }
        if let Some(needle) = text.strip_prefix("contains:") {
            return Self::Contains(needle.to_lowercase());
        }

        // Two-character operators first so `>=5` is not read as `>` with operand `=5`.
        let numeric: [(&str, fn(f64) -> Self); 4] = [
            (">=", Self::GreaterOrEqual),
            ("<=", Self::LessOrEqual),
            (">", Self::Greater),
            ("<", Self::Less),
        ];
        for (op, build) in numeric {
            if let Some(operand) = text.strip_prefix(op) {
                return operand.trim().parse::<f64>().map_or(Self::Never, build);
            }
        }

        Self::Equals(expected.clone())
    }

    /// Test an actual value (`None` when the path was absent).
    #[must_use]
    pub fn matches(&self, actual: Option<&Value>) -> bool {
        match self {
            Self::Equals(expected) => actual.is_some_and(|value| values_equal(value, expected)),
            Self::Greater(n) => number(actual).is_some_and(|v| v > *n),
            Self::GreaterOrEqual(n) => number(actual).is_some_and(|v| v >= *n),
            Self::Less(n) => number(actual).is_some_and(|v| v < *n),
            Self::LessOrEqual(n) => number(actual).is_some_and(|v| v <= *n),
            Self::NotNull => actual.is_some_and(|value| !value.is_null()),
            Self::Contains(needle) => match actual {
                Some(Value::String(s)) => s.to_lowercase().contains(needle.as_str()),
                Some(Value::Array(items)) => items
                    .iter()
                    .any(|item| stringify(item).to_lowercase().contains(needle.as_str())),
                _ => false,
            },
            Self::Never => false,
        }
    }
}

fn number(actual: Option<&Value>) -> Option<f64> {
    actual.and_then(Value::as_f64)
}

/// Check `actual` against an expected value, operators included.
#[must_use]
pub fn matches_value(actual: Option<&Value>, expected: &Value) -> bool {
    Predicate::parse(expected).matches(actual)
}
