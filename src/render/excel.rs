use super::cell_text;
use crate::{
    error::{ExtractorError, Result},
    models::ExtractedTable,
};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde_json::Value;

pub const XLSX_SHEET_NAME: &str = "Extracted Table";
pub const XLSX_FILE_NAME: &str = "extracted_table.xlsx";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Builds a single-sheet workbook: a bold header row, then one row per extracted row.
pub fn to_xlsx(table: &ExtractedTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(XLSX_SHEET_NAME)?;

    let header = Format::new().set_bold();
    for (col, name) in table.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, column_index(col)?, name, &header)?;
    }

    for (index, row) in table.rows.iter().enumerate() {
        let excel_row = row_index(index + 1)?;
        for (col, name) in table.columns.iter().enumerate() {
            write_cell(worksheet, excel_row, column_index(col)?, row.get(name))?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn column_index(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| {
        ExtractorError::ExportError(format!("too many columns to export ({})", col + 1))
    })
}

fn row_index(row: usize) -> Result<u32> {
    u32::try_from(row)
        .map_err(|_| ExtractorError::ExportError(format!("too many rows to export ({})", row)))
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, value: Option<&Value>) -> Result<()> {
    match value {
        None | Some(Value::Null) => {}
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) => {
                sheet.write_number(row, col, f)?;
            }
            None => {
                sheet.write_string(row, col, n.to_string())?;
            }
        },
        Some(Value::Bool(b)) => {
            sheet.write_boolean(row, col, *b)?;
        }
        Some(other) => {
            sheet.write_string(row, col, cell_text(Some(other)))?;
        }
    }
    Ok(())
}
