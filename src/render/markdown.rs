use super::cell_text;
use crate::models::ExtractedTable;

/// Renders the table as a GitHub pipe table. An empty table renders as an empty string.
pub fn to_markdown(table: &ExtractedTable) -> String {
    if table.is_empty() || table.columns.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    let header: Vec<String> = table.columns.iter().map(|c| escape(c)).collect();
    push_line(&mut out, &header);
    push_line(&mut out, &vec!["---".to_string(); table.columns.len()]);

    for row in &table.rows {
        let cells: Vec<String> = table
            .columns
            .iter()
            .map(|column| escape(&cell_text(row.get(column))))
            .collect();
        push_line(&mut out, &cells);
    }
    out
}

fn push_line(out: &mut String, cells: &[String]) {
    out.push_str("| ");
    out.push_str(&cells.join(" | "));
    out.push_str(" |\n");
}

fn escape(text: &str) -> String {
    text.replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}
