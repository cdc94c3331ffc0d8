//! HTTP fetch of the VIN decoder page.
//!
//! - The request URL is the configured base URL with the VIN appended verbatim.
//! - A browser-like User-Agent is sent; the decoder rejects default client ids.
//! - Anything other than `200 OK` is a failure, redirects included. Error bodies
//!   are not read.
//! - No retries. No timeout unless one is configured.

pub mod source;

pub use source::{LookupSource, RawDocument};

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode, redirect::Policy};
use url::Url;

use vinlookup_core::{AppConfig, Error};

/// Configuration for the lookup client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Decoder page prefix (default: "https://www.freevindecoder.eu/ro/")
    pub base_url: String,

    /// User agent string (default: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)")
    pub user_agent: String,

    /// Request timeout (default: none, the transport default applies)
    pub timeout: Option<Duration>,

    /// Honor HTTP(S)_PROXY environment variables (default: true)
    pub use_system_proxy: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let app = AppConfig::default();
        Self { base_url: app.base_url, user_agent: app.user_agent, timeout: None, use_system_proxy: true }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
            use_system_proxy: true,
        }
    }
}

/// HTTP client for the VIN decoder page.
#[derive(Debug, Clone)]
pub struct RemoteLookupClient {
    http: Client,
    config: FetchConfig,
}

impl RemoteLookupClient {
    /// Create a new lookup client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        Url::parse(&config.base_url).map_err(|e| Error::InvalidUrl(format!("{}: {e}", config.base_url)))?;

        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(Policy::none())
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        let http = builder
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// The page URL for a VIN.
    pub fn lookup_url(&self, vin: &str) -> String {
        format!("{}{}", self.config.base_url, vin)
    }
}

#[async_trait]
impl LookupSource for RemoteLookupClient {
    async fn fetch(&self, vin: &str) -> Result<RawDocument, Error> {
        let start = Instant::now();
        let url = self.lookup_url(vin);

        let response = self
            .http
            .get(&url)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::FetchTimeout(format!("{url}: {e}"))
                } else {
                    Error::HttpError(format!("network error: {}", e))
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::HttpError(format!("status {} for {}", status.as_u16(), url)));
        }

        let bytes: Bytes = response
            .bytes()
            .await
            .map_err(|e| Error::HttpError(format!("failed to read response: {}", e)))?;

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!("fetched {} in {}ms ({} bytes)", url, fetch_ms, bytes.len());

        Ok(RawDocument { url, body: String::from_utf8_lossy(&bytes).into_owned(), fetch_ms })
    }
}
