use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One extracted row, keyed by column name in the order the model produced them.
pub type Row = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTable {
    #[serde(default)]
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl ExtractedTable {
    /// Columns are the union of all row keys in first-seen order.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionOutcome {
    #[serde(flatten)]
    pub table: ExtractedTable,
    pub pages: usize,
    pub markdown: String,
    pub message: Option<String>,
}
