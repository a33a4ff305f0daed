pub const DEFAULT_COLUMNS: &str = "Invoice Number,Date,Supplier,Customer,Item,Qty,Price,Total";

/// Splits a comma separated header list, trimming names and dropping empty ones.
pub fn parse_columns(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|col| !col.is_empty())
        .map(String::from)
        .collect()
}

pub fn instruction_prompt(columns: &[String]) -> String {
    let mut prompt = String::from(
        "Extract all tables from this file and return them as JSON. \
         Each object is a row with keys as column names: ",
    );
    prompt.push_str(&columns.join(", "));
    prompt.push_str(
        ". Use the header from the first page for all subsequent pages, even if the header is missing. \
         For size and quantity: \
         - Only create a row if the quantity for that size is >= 1. \
         - The 'size' in each row must exactly match the column header of the filled cell. \
         - If quantity > 1, create multiple rows for that size with the same non-size data. \
         - Skip all blank or zero cells. \
         All other data from the row (product name, ID, etc.) should be copied to each new row. \
         Ignore totals, discounts, subtotals, and summary rows. \
         If a requested column is missing in the table, use metadata from the first page or above the table. \
         Do NOT invent sizes or reorder them. Return valid JSON only, no extra text.",
    );
    prompt
}
