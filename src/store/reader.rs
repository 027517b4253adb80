use std::path::Path;

use calamine::{open_workbook, Data, Range, Reader, Xlsx};

use crate::error::StorageError;
use crate::models::{CellValue, Table, TableCollection};

/// Read every sheet of the workbook. The first row of a sheet is its header;
/// everything below is data.
pub(super) fn read_workbook(path: &Path) -> Result<TableCollection, StorageError> {
    if !path.exists() {
        return Err(StorageError::Missing(path.to_path_buf()));
    }

    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|source| StorageError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tables = TableCollection::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|source| StorageError::Sheet {
                sheet: name.clone(),
                source,
            })?;
        tables.insert(table_from_range(&name, &range));
    }
    Ok(tables)
}

fn table_from_range(name: &str, range: &Range<Data>) -> Table {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Table::new(name, Vec::new());
    };

    // Blank header cells get the same placeholder name spreadsheet tools use.
    let columns = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| match cell_value(cell) {
            CellValue::Empty => format!("Unnamed: {idx}"),
            value => value.to_string(),
        })
        .collect();

    let mut table = Table::new(name, columns);
    for row in rows {
        table.push_row(row.iter().map(cell_value).collect());
    }
    table
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(text) => CellValue::text(text.as_str()),
        Data::Float(number) => CellValue::Number(*number),
        Data::Int(number) => CellValue::Number(*number as f64),
        Data::Bool(flag) => CellValue::Bool(*flag),
        Data::DateTime(moment) => {
            if moment.is_duration() {
                CellValue::Number(moment.as_f64())
            } else {
                moment
                    .as_datetime()
                    .map(CellValue::Date)
                    .unwrap_or(CellValue::Number(moment.as_f64()))
            }
        }
        Data::DateTimeIso(text) | Data::DurationIso(text) => CellValue::text(text.as_str()),
        Data::Error(err) => CellValue::text(err.to_string()),
    }
}
