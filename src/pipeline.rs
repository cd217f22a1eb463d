use std::path::{Path, PathBuf};
use color_eyre::eyre::WrapErr;
use futures::StreamExt;
use log::{debug, info};
use crate::config::{ColumnConfig, Config};
use crate::error::Result;
use crate::normalize::normalize_phone;
use crate::owner::{OwnerRecord, SearchKey};
use crate::resolver::PhoneResolver;
use crate::table::{read_table, write_table, Table, Value};

pub const DEFAULT_OUTPUT_STEM: &str = "leads_med_korrigerte_telefonnumre";

/// Counts reported after a table has been processed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// rows looked up
    pub rows: usize,
    /// rows with a phone number in the output
    pub found: usize,
    /// rows dropped for lacking a first name
    pub skipped: usize,
}

/// Look up a phone number for every owner in `table`.
///
/// Rows without a first name (companies, mostly) are dropped. The postal code
/// column is rewritten as text in its coerced form, and the search key and
/// normalized phone columns are filled in, appended when the table lacks them.
/// Other columns keep their values and types. Row order is kept regardless of
/// `concurrency`.
pub async fn enrich_table(
    table: &mut Table,
    resolver: &PhoneResolver,
    columns: &ColumnConfig,
    concurrency: usize,
) -> Result<Summary> {
    let first_col = table.column_index(&columns.first_name)?;
    let last_col = table.column_index(&columns.last_name)?;
    let postal_col = table.column_index(&columns.postal_code)?;

    let before = table.len();
    table.retain_rows(|row| row[first_col].is_some());
    let skipped = before - table.len();
    if skipped > 0 {
        info!("skipping [{skipped}] rows without [{}]", columns.first_name);
    }

    let key_col = table.ensure_column(&columns.search_key);
    let phone_col = table.ensure_column(&columns.phone);

    let mut owners: Vec<(OwnerRecord, SearchKey)> = Vec::with_capacity(table.len());
    for idx in 0..table.len() {
        let raw_postal = table.text(idx, postal_col);
        let record = OwnerRecord::new(
            table.text(idx, first_col).unwrap_or_default(),
            table.text(idx, last_col).unwrap_or_default(),
            raw_postal.as_deref().unwrap_or_default(),
        );
        let key = record.search_key();
        if raw_postal.is_some() {
            table.set_cell(idx, postal_col, Some(Value::Text(record.postal_code.clone())));
        }
        table.set_cell(idx, key_col, Some(Value::Text(key.to_string())));
        owners.push((record, key));
    }

    let total = owners.len();
    let phones = futures::stream::iter(owners.iter().enumerate()).map(|(idx, (record, key))| {
        async move {
            info!("[{}/{total}] looking up phone number for [{}]", idx + 1, record.display_name());
            normalize_phone(resolver.resolve(key).await)
        }
    })
        // `buffered` keeps input order, unlike `buffer_unordered`
        .buffered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    let mut found = 0;
    for (idx, phone) in phones.into_iter().enumerate() {
        if phone.is_some() {
            found += 1;
        }
        table.set_cell(idx, phone_col, phone.map(Value::Text));
    }

    Ok(Summary {
        rows: total,
        found,
        skipped,
    })
}

/// `leads_med_korrigerte_telefonnumre.<ext>` next to the input; workbooks come out as xlsx
pub fn default_output_path(input: &Path) -> PathBuf {
    let is_csv = input.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let ext = if is_csv { "csv" } else { "xlsx" };
    input.with_file_name(format!("{DEFAULT_OUTPUT_STEM}.{ext}"))
}

/// read `input`, look up every owner, write the result to `output`
#[tracing::instrument(skip(config))]
pub async fn process_file(input: &Path, output: &Path, config: &Config) -> color_eyre::Result<Summary> {
    let options = config.table_options();
    let mut table = read_table(input, &options)
        .wrap_err_with(|| format!("cannot read [{}]", input.display()))?;
    info!("loaded [{}] rows from [{}]", table.len(), input.display());
    for line in table.head(5) {
        debug!("preview: {line}");
    }

    let resolver = PhoneResolver::from_config(config)?;
    let summary = enrich_table(&mut table, &resolver, &config.columns, config.http.concurrency).await?;
    info!(
        "found phone numbers for [{}/{}] owners, skipped [{}] rows",
        summary.found, summary.rows, summary.skipped
    );

    info!("saving result to [{}]", output.display());
    write_table(&table, output, &options)
        .wrap_err_with(|| format!("cannot write [{}]", output.display()))?;
    Ok(summary)
}
