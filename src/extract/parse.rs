use crate::{
    error::{ExtractorError, Result},
    models::Row,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

// Greedy: from the first '[' to the last ']' so nested arrays stay intact.
static JSON_ARRAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*\]").expect("valid regex"));

/// Parses the rows out of a model answer that may wrap the JSON in prose or fences.
pub fn parse_rows(text: &str) -> Result<Vec<Row>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let Some(span) = JSON_ARRAY.find(text) else {
        log::warn!("Model answer contained no JSON array");
        return Ok(Vec::new());
    };

    let value: Value = serde_json::from_str(span.as_str())
        .map_err(|e| ExtractorError::ResponseError(format!("model returned invalid JSON: {}", e)))?;

    let items = match value {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };

    let total = items.len();
    let rows: Vec<Row> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(row) => Some(row),
            _ => None,
        })
        .collect();
    if rows.len() < total {
        log::debug!("Skipped {} non-object array elements", total - rows.len());
    }

    Ok(rows)
}
