use std::path::Path;
use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Workbook};
use crate::error::{Result, TableError};
use super::{Cell, Table, Value};

/// read the first worksheet, first row as header
pub(super) fn read(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range_at(0)
        .ok_or(TableError::EmptyWorkbook)??;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row.iter()
            .map(|cell| cell_value(cell).map(|value| value.to_string()).unwrap_or_default())
            .collect::<Vec<_>>(),
        None => return Ok(Table::default()),
    };

    let mut table = Table::new(headers);
    for row in rows {
        table.push_row(row.iter().map(cell_value).collect());
    }
    Ok(table)
}

fn cell_value(cell: &Data) -> Cell {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Value::Text(s.clone())),
        Data::Float(f) => Some(Value::Number(*f)),
        Data::Int(i) => Some(Value::Number(*i as f64)),
        Data::Bool(b) => Some(Value::Bool(*b)),
        Data::DateTime(dt) => Some(Value::DateTime(dt.as_f64())),
        Data::Error(e) => Some(Value::Text(format!("{e:?}"))),
    }
}

/// Write an xlsx file. Numbers and dates stay numeric cells, dates keep a date format.
pub(super) fn write(table: &Table, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();
    let date = Format::new().set_num_format("yyyy-mm-dd");
    let date_time = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

    for (col, header) in table.headers().iter().enumerate() {
        worksheet.write_string_with_format(0, col_num(col)?, header.as_str(), &bold)?;
    }
    for (idx, row) in table.rows().iter().enumerate() {
        let row_num = u32::try_from(idx + 1)
            .map_err(|_| TableError::TooLarge(format!("{} rows", table.len())))?;
        for (col, cell) in row.iter().enumerate() {
            let col = col_num(col)?;
            match cell {
                None => {}
                Some(Value::Text(s)) => {
                    worksheet.write_string(row_num, col, s.as_str())?;
                }
                Some(Value::Number(n)) => {
                    worksheet.write_number(row_num, col, *n)?;
                }
                Some(Value::Bool(b)) => {
                    worksheet.write_boolean(row_num, col, *b)?;
                }
                Some(Value::DateTime(serial)) => {
                    let format = if serial.fract() == 0.0 { &date } else { &date_time };
                    worksheet.write_number_with_format(row_num, col, *serial, format)?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn col_num(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| TableError::TooLarge(format!("column {col}")))
}
