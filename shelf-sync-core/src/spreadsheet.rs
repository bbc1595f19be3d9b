//! Loads a dropped price file into ordered [`SourceRow`]s.
//!
//! The first row is the header. Cells are kept as text; numeric coercion is
//! left to the transformer so a bad price never rejects a whole file.

use std::collections::HashMap;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::info;

use crate::error::{SyncError, SyncResult};

/// One spreadsheet row, reduced to the columns the pipeline cares about.
/// `None` means the cell was empty or the column is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRow {
    pub item_id: Option<String>,
    pub item_name: Option<String>,
    pub item_number: Option<String>,
    pub primary_upc: Option<String>,
    pub unit_price: Option<String>,
}

/// Header plus raw cells, whatever the file format.
struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

/// Read `path` and check that every column in `required_columns` is present.
pub fn read_rows(path: &Path, required_columns: &[String]) -> SyncResult<Vec<SourceRow>> {
    info!(file = %path.display(), "Reading spreadsheet");

    let table = if has_extension(path, "csv") {
        load_csv(path)?
    } else {
        load_workbook(path)?
    };

    for column in required_columns {
        if !table.headers.iter().any(|h| h == column) {
            return Err(SyncError::Schema {
                path: path.to_path_buf(),
                column: column.clone(),
            });
        }
    }

    // A repeated header resolves to its first column.
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (i, h) in table.headers.iter().enumerate() {
        index.entry(h.as_str()).or_insert(i);
    }
    let cell = |row: &[Option<String>], name: &str| -> Option<String> {
        index
            .get(name)
            .and_then(|&i| row.get(i))
            .cloned()
            .flatten()
    };

    let rows: Vec<SourceRow> = table
        .rows
        .iter()
        .map(|row| SourceRow {
            item_id: cell(row, "ItemID"),
            item_name: cell(row, "ItemName"),
            item_number: cell(row, "ItemNumber"),
            primary_upc: cell(row, "PrimaryUpc"),
            unit_price: cell(row, "UnitPrice"),
        })
        .collect();

    info!(file = %path.display(), rows = rows.len(), "Spreadsheet loaded");
    Ok(rows)
}

pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

fn load_workbook(path: &Path) -> SyncResult<Table> {
    let read_error = |reason: String| SyncError::Read {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| read_error(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| read_error("workbook has no sheets".to_string()))?
        .map_err(|e| read_error(e.to_string()))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header) => header
            .iter()
            .map(|c| cell_text(c).unwrap_or_default().trim().to_string())
            .collect(),
        None => Vec::new(),
    };
    let rows = rows
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    Ok(Table { headers, rows })
}

fn load_csv(path: &Path) -> SyncResult<Table> {
    let read_error = |reason: String| SyncError::Read {
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| read_error(e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| read_error(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| read_error(e.to_string()))?;
        rows.push(
            record
                .iter()
                .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
                .collect(),
        );
    }

    Ok(Table { headers, rows })
}

/// Text form of a workbook cell. Whole numbers drop the trailing `.0` Excel
/// stores them with, so an item id of 1001 reads as "1001".
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(format_number(*f)),
        other => Some(other.to_string()),
    }
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
