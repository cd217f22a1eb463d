use std::collections::HashSet;
use std::path::Path;
use color_eyre::eyre::{bail, WrapErr};
use serde::{Deserialize, Serialize};
use crate::directory::{parse_base_url, GULESIDER_BASE_URL, OPPLYSNING_1881_BASE_URL};
use crate::table::TableOptions;

const UA: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Runtime configuration. Every field has a default, so an empty TOML file is valid.
///
/// ```toml
/// [columns]
/// first_name = "Eier Fornavn"
///
/// [http]
/// concurrency = 4
///
/// [sources]
/// gulesider = "https://www.gulesider.no"
/// 1881 = "https://www.1881.no"
///
/// [table]
/// csv_delimiter = ";"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub columns: ColumnConfig,
    pub http: HttpConfig,
    pub sources: SourceConfig,
    pub table: TableConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnConfig {
    pub first_name: String,
    pub last_name: String,
    pub postal_code: String,
    /// output column holding the search key
    pub search_key: String,
    /// output column holding the normalized phone number
    pub phone: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            first_name: "Eier Fornavn".to_string(),
            last_name: "Eier Etternavn".to_string(),
            postal_code: "Eier Postnummer".to_string(),
            search_key: "søk".to_string(),
            phone: "Telefon".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    /// extra attempts per page after a transport failure
    pub retries: usize,
    /// rows resolved at the same time
    pub concurrency: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: UA.to_string(),
            timeout_secs: 30,
            retries: 2,
            concurrency: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub gulesider: String,
    #[serde(rename = "1881")]
    pub opplysning_1881: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            gulesider: GULESIDER_BASE_URL.to_string(),
            opplysning_1881: OPPLYSNING_1881_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    pub csv_delimiter: char,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { csv_delimiter: ',' }
    }
}

impl Config {
    /// load from a TOML file, or the defaults when no file is given
    pub fn load(path: Option<&Path>) -> color_eyre::Result<Self> {
        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .wrap_err_with(|| format!("cannot read config file [{}]", path.display()))?;
                Self::from_toml_str(&content)
                    .wrap_err_with(|| format!("invalid config file [{}]", path.display()))?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> color_eyre::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> color_eyre::Result<()> {
        if self.http.concurrency == 0 {
            bail!("http.concurrency must be at least 1");
        }
        if self.http.timeout_secs == 0 {
            bail!("http.timeout_secs must be at least 1");
        }
        parse_base_url(&self.sources.gulesider).wrap_err("sources.gulesider")?;
        parse_base_url(&self.sources.opplysning_1881).wrap_err("sources.1881")?;
        if !self.table.csv_delimiter.is_ascii() {
            bail!("table.csv_delimiter must be a single ASCII character, got [{}]", self.table.csv_delimiter);
        }
        let columns = [
            &self.columns.first_name,
            &self.columns.last_name,
            &self.columns.postal_code,
            &self.columns.search_key,
            &self.columns.phone,
        ];
        if columns.iter().any(|name| name.is_empty()) {
            bail!("column names must not be empty");
        }
        let mut seen = HashSet::new();
        if let Some(duplicate) = columns.iter().find(|name| !seen.insert(name.as_str())) {
            bail!("column name [{duplicate}] is configured more than once");
        }
        Ok(())
    }

    pub fn table_options(&self) -> TableOptions {
        TableOptions {
            // validated as ASCII
            csv_delimiter: self.table.csv_delimiter as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.columns.first_name, "Eier Fornavn");
        assert_eq!(config.columns.phone, "Telefon");
        assert_eq!(config.http.concurrency, 1);
        assert_eq!(config.sources.opplysning_1881, "https://www.1881.no");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml_str(r#"
[http]
concurrency = 4

[sources]
1881 = "http://localhost:9000"

[table]
csv_delimiter = ";"
"#).unwrap();
        assert_eq!(config.http.concurrency, 4);
        assert_eq!(config.http.retries, 2);
        assert_eq!(config.sources.opplysning_1881, "http://localhost:9000");
        assert_eq!(config.sources.gulesider, "https://www.gulesider.no");
        assert_eq!(config.table_options().csv_delimiter, b';');
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_toml_str("[http]\nconcurency = 4\n").is_err());
    }

    #[test]
    fn zero_concurrency_is_invalid() {
        let mut config = Config::default();
        config.http.concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_ascii_delimiter_is_invalid() {
        let mut config = Config::default();
        config.table.csv_delimiter = '§';
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let mut config = Config::default();
        config.http.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_source_urls_are_invalid() {
        for url in ["not a url", "ftp://www.1881.no", "mailto:post@gulesider.no"] {
            let mut config = Config::default();
            config.sources.opplysning_1881 = url.to_string();
            assert!(config.validate().is_err(), "{url}");
        }
        let mut config = Config::default();
        config.sources.gulesider = "gulesider.no".to_string();
        let err = config.validate().unwrap_err();
        assert!(format!("{err:#}").contains("sources.gulesider"), "{err:#}");
    }

    #[test]
    fn bad_source_url_in_file_fails_to_load() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[sources]\n1881 = \"localhost:9000\"").unwrap();
        assert!(Config::load(Some(file.path())).is_err());
    }

    #[test]
    fn duplicate_column_names_are_invalid() {
        let mut config = Config::default();
        config.columns.phone = "Eier Fornavn".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Eier Fornavn"), "{err}");

        let mut config = Config::default();
        config.columns.search_key = config.columns.phone.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[columns]\nphone = \"Mobil\"").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.columns.phone, "Mobil");
        assert_eq!(config.columns.search_key, "søk");
    }

    #[test]
    fn load_without_file() {
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }
}
