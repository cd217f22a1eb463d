use std::fmt;
use std::path::Path;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use crate::error::{Result, TableError};

mod delimited;
mod workbook;

/// Typed content of a non-empty cell
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    /// Excel serial date: days since 1899-12-30, time as the fraction
    DateTime(f64),
    Bool(bool),
}

/// A cell is either absent (empty in the sheet) or a value.
pub type Cell = Option<Value>;

impl Value {
    /// the calendar date and time of an Excel serial
    pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
        // Excel stops at 9999-12-31
        if !serial.is_finite() || !(0.0..3_000_000.0).contains(&serial) {
            return None;
        }
        let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
        let millis = (serial * 86_400_000.0).round() as i64;
        epoch.checked_add_signed(Duration::milliseconds(millis))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::DateTime(serial) => match Self::serial_to_datetime(*serial) {
                Some(dt) if dt.time() == NaiveTime::default() => write!(f, "{}", dt.format("%Y-%m-%d")),
                Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
                None => write!(f, "{serial}"),
            },
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// In-memory spreadsheet: a header row plus data rows of equal width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// append a row, padding or cutting it to the header width
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.headers.len(), None);
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers.iter()
            .position(|header| header == name)
            .ok_or_else(|| TableError::MissingColumn {
                column: name.to_string(),
                available: self.headers.clone(),
            })
    }

    /// index of `name`, appending an empty column when it does not exist yet
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Ok(idx) = self.column_index(name) {
            return idx;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(None);
        }
        self.headers.len() - 1
    }

    pub fn value(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row)?.get(col)?.as_ref()
    }

    /// the cell as it reads in the sheet; numbers and dates are rendered
    pub fn text(&self, row: usize, col: usize) -> Option<String> {
        self.value(row, col).map(Value::to_string)
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: Cell) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = value;
        }
    }

    pub fn retain_rows(&mut self, f: impl FnMut(&Vec<Cell>) -> bool) {
        self.rows.retain(f);
    }

    /// first `n` rows rendered as tab separated lines, header included
    pub fn head(&self, n: usize) -> Vec<String> {
        let header = self.headers.join("\t");
        let rows = self.rows.iter()
            .take(n)
            .map(|row| {
                row.iter()
                    .map(|cell| cell.as_ref().map(Value::to_string).unwrap_or_default())
                    .collect::<Vec<_>>()
                    .join("\t")
            });
        std::iter::once(header).chain(rows).collect()
    }
}

/// File formats the pipeline reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    /// anything calamine opens; written back as xlsx
    Workbook,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Self::Workbook),
            _ => Err(TableError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// like [TableFormat::from_path], but workbooks can only be written as xlsx
    pub fn for_output(path: &Path) -> Result<Self> {
        let format = Self::from_path(path)?;
        let is_xlsx = path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
        if format == Self::Workbook && !is_xlsx {
            return Err(TableError::UnsupportedFormat(path.display().to_string()));
        }
        Ok(format)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TableOptions {
    pub csv_delimiter: u8,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self { csv_delimiter: b',' }
    }
}

pub fn read_table(path: impl AsRef<Path>, options: &TableOptions) -> Result<Table> {
    let path = path.as_ref();
    match TableFormat::from_path(path)? {
        TableFormat::Csv => delimited::read(path, options.csv_delimiter),
        TableFormat::Workbook => workbook::read(path),
    }
}

/// write `table` to `path`, creating parent directories as needed
pub fn write_table(table: &Table, path: impl AsRef<Path>, options: &TableOptions) -> Result<()> {
    let path = path.as_ref();
    let format = TableFormat::for_output(path)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    match format {
        TableFormat::Csv => delimited::write(table, path, options.csv_delimiter),
        TableFormat::Workbook => workbook::write(table, path),
    }
}
