use std::time::Duration;
use async_trait::async_trait;
use color_eyre::eyre::{bail, eyre, WrapErr};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Url};
use crate::config::HttpConfig;
use crate::owner::SearchKey;
use crate::utils::{retry_wrapper, RetryPolicy};

mod page;

pub use page::SearchResultPage;

pub const GULESIDER_BASE_URL: &str = "https://www.gulesider.no";
pub const OPPLYSNING_1881_BASE_URL: &str = "https://www.1881.no";

/// A phone directory that can be searched with a [SearchKey].
///
/// `Ok(None)` means the directory answered but listed no number. Errors are
/// transport failures; the resolver decides what to do with them.
#[async_trait]
pub trait DirectorySource: Send + Sync {
    fn name(&self) -> &str;

    async fn lookup(&self, key: &SearchKey) -> color_eyre::Result<Option<String>>;
}

/// HTTP client shared by all directory sources
#[derive(Clone)]
pub struct DirectoryClient {
    client: Client,
    retry: RetryPolicy,
}

impl DirectoryClient {
    pub fn new(config: &HttpConfig) -> color_eyre::Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        Ok(
            Self {
                client: Client::builder()
                    .default_headers(Self::default_headers(&config.user_agent)?)
                    .timeout(timeout)
                    .build()?,
                retry: RetryPolicy::for_requests(config.retries, timeout),
            }
        )
    }

    fn default_headers(user_agent: &str) -> color_eyre::Result<HeaderMap> {
        let mut map = HeaderMap::new();
        let value = HeaderValue::from_str(user_agent)
            .wrap_err_with(|| format!("invalid user agent [{user_agent}]"))?;
        map.insert(USER_AGENT, value);
        Ok(map)
    }

    /// get the body of a page, whatever its status code
    async fn fetch_page(&self, url: &Url) -> color_eyre::Result<String> {
        debug!("GET {url}");
        Ok(
            retry_wrapper(url.as_str(), self.retry, || async {
                self.client
                    .get(url.clone())
                    .send()
                    .await?
                    .text()
                    .await
            }).await?
        )
    }
}

pub(crate) fn parse_base_url(base_url: &str) -> color_eyre::Result<Url> {
    let url = Url::parse(base_url)
        .wrap_err_with(|| format!("invalid directory base url [{base_url}]"))?;
    if url.cannot_be_a_base() {
        bail!("directory url [{base_url}] cannot be used as a base");
    }
    if !matches!(url.scheme(), "http" | "https") {
        bail!("directory url [{base_url}] must be http or https");
    }
    Ok(url)
}

/// Gule Sider person search, keyed by URL path: `<base>/<key>/personer`
pub struct Gulesider {
    client: DirectoryClient,
    base_url: Url,
}

impl Gulesider {
    pub fn new(client: DirectoryClient, base_url: &str) -> color_eyre::Result<Self> {
        Ok(
            Self {
                client,
                base_url: parse_base_url(base_url)?,
            }
        )
    }

    pub fn search_url(&self, key: &SearchKey) -> color_eyre::Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| eyre!("cannot build search url from [{}]", self.base_url))?
            .pop_if_empty()
            .push(key.as_str())
            .push("personer");
        Ok(url)
    }
}

#[async_trait]
impl DirectorySource for Gulesider {
    fn name(&self) -> &str {
        "gulesider"
    }

    async fn lookup(&self, key: &SearchKey) -> color_eyre::Result<Option<String>> {
        let html = self.client.fetch_page(&self.search_url(key)?).await?;
        Ok(SearchResultPage::parse_gulesider(&html).into_phone())
    }
}

/// 1881 search, keyed by the `query` parameter: `<base>/?query=<key>`
pub struct Opplysning1881 {
    client: DirectoryClient,
    base_url: Url,
}

impl Opplysning1881 {
    pub fn new(client: DirectoryClient, base_url: &str) -> color_eyre::Result<Self> {
        Ok(
            Self {
                client,
                base_url: parse_base_url(base_url)?,
            }
        )
    }

    pub fn search_url(&self, key: &SearchKey) -> Url {
        let mut url = self.base_url.clone();
        // form encoding turns the spaces back into `+`
        url.query_pairs_mut().append_pair("query", &key.as_words());
        url
    }
}

#[async_trait]
impl DirectorySource for Opplysning1881 {
    fn name(&self) -> &str {
        "1881"
    }

    async fn lookup(&self, key: &SearchKey) -> color_eyre::Result<Option<String>> {
        let html = self.client.fetch_page(&self.search_url(key)).await?;
        Ok(SearchResultPage::parse_1881(&html).into_phone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> DirectoryClient {
        DirectoryClient::new(&HttpConfig::default()).unwrap()
    }

    #[test]
    fn gulesider_key_in_path() {
        let source = Gulesider::new(client(), GULESIDER_BASE_URL).unwrap();
        let key = SearchKey::new("Ola", "Nordmann", "0123");
        assert_eq!(
            source.search_url(&key).unwrap().as_str(),
            "https://www.gulesider.no/ola+nordmann+0123/personer"
        );
    }

    #[test]
    fn gulesider_escapes_slashes() {
        let source = Gulesider::new(client(), "http://localhost:8080/sok/").unwrap();
        let key = SearchKey::new("a/s", "b?c", "1");
        assert_eq!(
            source.search_url(&key).unwrap().as_str(),
            "http://localhost:8080/sok/a%2Fs+b%3Fc+1/personer"
        );
    }

    #[test]
    fn number_1881_key_in_query() {
        let source = Opplysning1881::new(client(), OPPLYSNING_1881_BASE_URL).unwrap();
        let key = SearchKey::new("Ola", "Nordmann", "0123");
        assert_eq!(
            source.search_url(&key).as_str(),
            "https://www.1881.no/?query=ola+nordmann+0123"
        );
    }

    #[test]
    fn number_1881_escapes_ampersand() {
        let source = Opplysning1881::new(client(), OPPLYSNING_1881_BASE_URL).unwrap();
        let key = SearchKey::new("Ola&Kari", "Nordmann", "0123");
        assert_eq!(
            source.search_url(&key).as_str(),
            "https://www.1881.no/?query=ola%26kari+nordmann+0123"
        );
    }

    #[test]
    fn bad_base_urls_are_rejected() {
        assert!(Gulesider::new(client(), "not a url").is_err());
        assert!(Opplysning1881::new(client(), "mailto:someone@example.com").is_err());
        assert!(Opplysning1881::new(client(), "ftp://www.1881.no").is_err());
    }

    #[test]
    fn bad_user_agent_is_rejected() {
        let config = HttpConfig {
            user_agent: "bad\nagent".to_string(),
            ..HttpConfig::default()
        };
        assert!(DirectoryClient::new(&config).is_err());
    }
}
