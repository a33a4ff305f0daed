pub mod excel;
pub mod markdown;

pub use excel::{to_xlsx, XLSX_FILE_NAME, XLSX_MIME, XLSX_SHEET_NAME};
pub use markdown::to_markdown;

use serde_json::Value;

/// Display text for one cell: strings verbatim, null empty, everything else as compact JSON.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
