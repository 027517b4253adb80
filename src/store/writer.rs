use std::io::Write;
use std::path::Path;

use chrono::{NaiveDateTime, NaiveTime};
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet, XlsxError};
use tempfile::NamedTempFile;

use crate::error::StorageError;
use crate::models::{CellValue, Table, TableCollection};

/// Excel serial number of 1970-01-01.
const UNIX_EPOCH_SERIAL: f64 = 25_569.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

struct Formats {
    header: Format,
    date: Format,
    datetime: Format,
}

/// Render every table, in collection order, into an in-memory xlsx file.
pub(super) fn render_workbook(tables: &TableCollection) -> Result<Vec<u8>, StorageError> {
    let formats = Formats {
        header: Format::new().set_bold(),
        date: Format::new().set_num_format("dd.mm.yyyy"),
        datetime: Format::new().set_num_format("dd.mm.yyyy hh:mm"),
    };

    let mut workbook = Workbook::new();
    for table in tables {
        let sheet = workbook.add_worksheet();
        sheet.set_name(table.name())?;
        write_table(sheet, table, &formats)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Replace `path` with `bytes` by writing a sibling temp file and renaming it
/// over the target, so a failed write leaves the previous workbook in place.
pub(super) fn replace_file(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let write_err = |source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(write_err)?;
    temp.write_all(bytes).map_err(write_err)?;
    temp.as_file().sync_all().map_err(write_err)?;
    temp.persist(path).map_err(|err| write_err(err.error))?;
    Ok(())
}

fn write_table(sheet: &mut Worksheet, table: &Table, formats: &Formats) -> Result<(), XlsxError> {
    for (col_idx, column) in table.columns().iter().enumerate() {
        sheet.write_string_with_format(0, col_num(col_idx)?, column, &formats.header)?;
    }

    for (row_idx, row) in table.rows().iter().enumerate() {
        let row_num = RowNum::try_from(row_idx + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col_idx, cell) in row.iter().enumerate() {
            let col = col_num(col_idx)?;
            match cell {
                CellValue::Empty => {}
                CellValue::Text(text) => {
                    sheet.write_string(row_num, col, text)?;
                }
                CellValue::Number(number) if number.is_finite() => {
                    sheet.write_number(row_num, col, *number)?;
                }
                CellValue::Number(_) => {}
                CellValue::Bool(flag) => {
                    sheet.write_boolean(row_num, col, *flag)?;
                }
                CellValue::Date(moment) => {
                    let format = if moment.time() == NaiveTime::MIN {
                        &formats.date
                    } else {
                        &formats.datetime
                    };
                    sheet.write_number_with_format(row_num, col, excel_serial(*moment), format)?;
                }
            }
        }
    }
    Ok(())
}

fn col_num(idx: usize) -> Result<ColNum, XlsxError> {
    ColNum::try_from(idx).map_err(|_| XlsxError::RowColumnLimitError)
}

fn excel_serial(moment: NaiveDateTime) -> f64 {
    let utc = moment.and_utc();
    let seconds = utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_millis()) / 1000.0;
    UNIX_EPOCH_SERIAL + seconds / SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn serial_matches_excel_calendar() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 5)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        assert_eq!(excel_serial(day), 45_296.0);

        let noon = NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();
        assert_eq!(excel_serial(noon), 25_569.5);
    }
}
