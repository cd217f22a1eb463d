use std::path::Path;
use csv::{ReaderBuilder, WriterBuilder};
use crate::error::Result;
use super::{Cell, Table, Value};

pub(super) fn read(path: &Path, delimiter: u8) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;

    let headers = rdr.headers()?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').to_string())
        .collect::<Vec<_>>();
    let mut table = Table::new(headers);

    for record in rdr.records() {
        let row = record?
            .iter()
            .map(|field| if field.is_empty() { None } else { Some(Value::from(field)) })
            .collect::<Vec<Cell>>();
        table.push_row(row);
    }
    Ok(table)
}

pub(super) fn write(table: &Table, path: &Path, delimiter: u8) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;
    wtr.write_record(table.headers())?;
    for row in table.rows() {
        wtr.write_record(row.iter().map(|cell| cell.as_ref().map(Value::to_string).unwrap_or_default()))?;
    }
    wtr.flush()?;
    Ok(())
}
