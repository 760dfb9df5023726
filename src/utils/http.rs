// src/utils/http.rs

//! HTTP transport for the XML REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;
use url::Url;

use crate::error::Result;
use crate::models::ClientConfig;
use crate::utils::xml;

/// A source of parsed XML documents addressed by API path.
///
/// Implementations return the document as a JSON-like tree (see
/// [`crate::utils::xml`]); any transport or parse failure is an `Err`.
#[async_trait]
pub trait XmlSource: Send + Sync {
    /// Fetch and parse the document at `path` (relative to the API root,
    /// including any query string).
    async fn fetch(&self, path: &str) -> Result<Value>;
}

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &ClientConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/xml"));

    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Join an API path onto the base URL, keeping the base URL's own path.
pub fn endpoint_url(base_url: &Url, path: &str) -> Result<Url> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    Ok(base.join(path.trim_start_matches('/'))?)
}

/// `XmlSource` backed by a live HTTP endpoint.
pub struct HttpSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSource {
    /// Create a source for the API rooted at `config.base_url`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: create_client(config)?,
            base_url: Url::parse(&config.base_url)?,
        })
    }
}

#[async_trait]
impl XmlSource for HttpSource {
    async fn fetch(&self, path: &str) -> Result<Value> {
        let url = endpoint_url(&self.base_url, path)?;
        log::debug!("GET {url}");

        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        xml::parse(&body)
    }
}
