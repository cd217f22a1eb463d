use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("missing required column [{column}], available columns: {available:?}")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("unsupported spreadsheet format: [{0}]")]
    UnsupportedFormat(String),

    #[error("workbook has no worksheet")]
    EmptyWorkbook,

    #[error("table is too large for the output format: {0}")]
    TooLarge(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot read workbook: {0}")]
    XlsxRead(#[from] calamine::Error),

    #[error("cannot write workbook: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TableError>;
