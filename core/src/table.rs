//! Rendering an API collection into a table element.

use serde_json::Value;
use thiserror::Error;

use crate::dom::{Element, SelectorError};
use crate::error::ApiError;

/// Why a table could not be (re)built.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] ApiError),

    #[error("expected a JSON array, got {found}")]
    NotACollection { found: &'static str },

    #[error(transparent)]
    Selector(#[from] SelectorError),
}

/// Result of `Page::load_table`. Failures are already logged by the time
/// this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableOutcome {
    Rendered { rows: usize },
    /// The selector matched nothing; the fetched data was dropped.
    TargetMissing,
    Failed,
}

/// Borrow the items of a collection response.
pub fn as_collection(data: &Value) -> Result<&[Value], LoadError> {
    match data {
        Value::Array(items) => Ok(items),
        other => Err(LoadError::NotACollection {
            found: json_type(other),
        }),
    }
}

/// Replace every child of `table` with one row per item, in order. Each row
/// holds a single cell containing the item's JSON text.
pub fn render_rows(table: &mut Element, items: &[Value]) -> usize {
    table.clear_children();
    for item in items {
        let cell = Element::new("td").with_text(&cell_text(item));
        table.append_child(Element::new("tr").with_child(cell));
    }
    items.len()
}

/// Largest integer an f64 holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// JSON text of one item the way a browser's `JSON.stringify` writes it:
/// object keys in the order received, integral floats without `.0`.
pub fn cell_text(item: &Value) -> String {
    normalize_numbers(item).to_string()
}

fn normalize_numbers(value: &Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER => Value::from(f as i64),
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(normalize_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), normalize_numbers(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
