//! Excel export of list records.

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use serde_json::Value;

use crate::de;
use crate::resource::Column;

pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const MAX_SHEET_NAME_CHARS: usize = 31;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("spreadsheet write failed: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("too many rows for one sheet: {0}")]
    TooManyRows(usize),
    #[error("too many columns for one sheet: {0}")]
    TooManyColumns(usize),
}

/// What one spreadsheet cell holds.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Blank,
    Number(f64),
    Text(String),
}

/// Cell for one record field.
///
/// Numbers stay numbers, numeric strings become numbers only in numeric
/// columns, booleans read `Yes`/`No`, nested values are written as compact
/// JSON and missing or null fields are blank.
#[must_use]
pub fn cell_value(column: &Column, value: Option<&Value>) -> Cell {
    let Some(value) = value else {
        return Cell::Blank;
    };
    match value {
        Value::Null => Cell::Blank,
        Value::Bool(b) => Cell::Text(if *b { "Yes" } else { "No" }.to_owned()),
        Value::Number(n) => n.as_f64().map_or(Cell::Blank, Cell::Number),
        Value::String(s) => match de::value_to_f64(value).filter(|_| column.numeric) {
            Some(f) => Cell::Number(f),
            None => Cell::Text(s.clone()),
        },
        Value::Array(_) | Value::Object(_) => Cell::Text(value.to_string()),
    }
}

/// Render `records` as a single-sheet workbook: a bold header row from
/// `columns`, then one row of [`cell_value`]s per record.
///
/// # Errors
///
/// Returns [`ExportError`] if the sheet would exceed Excel's limits or the
/// writer fails.
pub fn export_records(sheet: &str, columns: &[Column], records: &[Value]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(sheet))?;

    for (idx, column) in columns.iter().enumerate() {
        let col = u16::try_from(idx).map_err(|_| ExportError::TooManyColumns(columns.len()))?;
        worksheet.write_string_with_format(0, col, column.title, &header)?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row = u32::try_from(idx + 1).map_err(|_| ExportError::TooManyRows(records.len()))?;
        for (col, column) in columns.iter().enumerate() {
            // Column count already checked against u16 above.
            let col = col as u16;
            write_cell(worksheet, row, col, cell_value(column, record.get(column.key)))?;
        }
    }
    worksheet.autofit();

    Ok(workbook.save_to_buffer()?)
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: Cell) -> Result<(), XlsxError> {
    match cell {
        Cell::Blank => {}
        Cell::Number(f) => {
            worksheet.write_number(row, col, f)?;
        }
        Cell::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
    }
    Ok(())
}

/// Excel sheet names: at most 31 chars, none of `[]:*?/\`, not blank.
#[must_use]
pub fn sheet_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME_CHARS)
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'');
    if cleaned.is_empty() { "Sheet1".to_owned() } else { cleaned.to_owned() }
}

/// Download file name for an export, e.g. `customers-2024-06-15.xlsx`.
#[must_use]
pub fn file_name(slug: &str, date: chrono::NaiveDate) -> String {
    format!("{slug}-{}.xlsx", date.format("%Y-%m-%d"))
}
