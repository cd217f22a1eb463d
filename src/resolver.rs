use color_eyre::eyre::Report;
use log::{debug, warn};
use crate::config::Config;
use crate::directory::{DirectoryClient, DirectorySource, Gulesider, Opplysning1881};
use crate::owner::SearchKey;

/// Outcome of asking one directory for a key
#[derive(Debug)]
pub enum Lookup {
    Found(String),
    NotFound,
    /// transport failure; counts as [Lookup::NotFound] for resolution
    Failed(Report),
}

impl Lookup {
    pub fn into_phone(self) -> Option<String> {
        match self {
            Lookup::Found(phone) => Some(phone),
            Lookup::NotFound | Lookup::Failed(_) => None,
        }
    }
}

/// Asks directory sources in priority order; the first one with a number wins.
pub struct PhoneResolver {
    sources: Vec<Box<dyn DirectorySource>>,
}

impl PhoneResolver {
    pub fn new(sources: Vec<Box<dyn DirectorySource>>) -> Self {
        Self { sources }
    }

    /// Gule Sider first, then 1881
    pub fn from_config(config: &Config) -> color_eyre::Result<Self> {
        let client = DirectoryClient::new(&config.http)?;
        let sources: Vec<Box<dyn DirectorySource>> = vec![
            Box::new(Gulesider::new(client.clone(), &config.sources.gulesider)?),
            Box::new(Opplysning1881::new(client, &config.sources.opplysning_1881)?),
        ];
        Ok(Self::new(sources))
    }

    pub async fn resolve(&self, key: &SearchKey) -> Option<String> {
        for source in &self.sources {
            match Self::query(source.as_ref(), key).await {
                Lookup::Found(phone) => {
                    debug!("[{key}] found [{phone}] on {}", source.name());
                    return Some(phone);
                }
                Lookup::NotFound => debug!("[{key}] not listed on {}", source.name()),
                Lookup::Failed(e) => warn!("[{key}] lookup on {} failed, treating as no match: {e:#}", source.name()),
            }
        }
        None
    }

    pub async fn query(source: &dyn DirectorySource, key: &SearchKey) -> Lookup {
        match source.lookup(key).await {
            Ok(Some(phone)) if !phone.trim().is_empty() => Lookup::Found(phone),
            Ok(_) => Lookup::NotFound,
            Err(e) => Lookup::Failed(e),
        }
    }
}
