//! SEC EDGAR registry client with host allow-listing, pacing and retries.

use crate::error::{DataError, Result};
use reqwest::Url;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, REFERER};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Hosts the client is permitted to contact.
pub const ALLOWED_HOSTS: [&str; 2] = ["www.sec.gov", "data.sec.gov"];

/// User agent for SEC EDGAR requests (SEC requires identifying information)
pub const DEFAULT_USER_AGENT: &str = "Mizan-Screener/0.1 (contact@example.com)";

/// Pause before the first attempt.
const DEFAULT_PACING: Duration = Duration::from_millis(300);

/// Extra pause added per retry.
const DEFAULT_BACKOFF_STEP: Duration = Duration::from_millis(600);

const DEFAULT_MAX_ATTEMPTS: u32 = 4;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection and retry settings for [`RegistryClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Value of the `User-Agent` header
    pub user_agent: String,
    /// Delay awaited before every attempt, including the first
    pub pacing: Duration,
    /// Additional delay per attempt index
    pub backoff_step: Duration,
    /// Total number of attempts per request
    pub max_attempts: u32,
    /// Per-request timeout
    pub timeout: Duration,
    /// Hosts that may be contacted
    pub allowed_hosts: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            pacing: DEFAULT_PACING,
            backoff_step: DEFAULT_BACKOFF_STEP,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: DEFAULT_TIMEOUT,
            allowed_hosts: ALLOWED_HOSTS.iter().map(|h| (*h).to_string()).collect(),
        }
    }
}

impl ClientConfig {
    /// Replaces the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Delay awaited before the attempt with the given zero-based index.
    pub fn pacing_delay(&self, attempt: u32) -> Duration {
        self.pacing + self.backoff_step * attempt
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl RawResponse {
    /// Returns true for 2xx statuses.
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Performs a single GET request.
pub trait Transport: Send + Sync {
    /// Fetches `url` once, without retrying.
    fn get(&self, url: &Url) -> impl Future<Output = Result<RawResponse>> + Send;
}

/// Awaits the pacing delay between attempts.
pub trait Pacer: Send + Sync {
    /// Suspends for `delay`.
    fn pause(&self, delay: Duration) -> impl Future<Output = ()> + Send;
}

/// [`Pacer`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Builds a transport sending the configured identification headers.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain"),
        );
        headers.insert(REFERER, HeaderValue::from_static("https://www.sec.gov/"));

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(DataError::Network)?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}

/// Rate-conscious client for the SEC EDGAR registry.
///
/// Every request is checked against the host allow-list, then attempted up
/// to [`ClientConfig::max_attempts`] times. A pacing delay precedes each
/// attempt and grows linearly with the attempt index, since the registry
/// punishes bursts. Non-2xx statuses (429 and 403 included) and transport
/// errors are all treated as retryable.
pub struct RegistryClient<T = HttpTransport, P = TokioPacer> {
    transport: T,
    pacer: P,
    config: ClientConfig,
}

impl RegistryClient {
    /// Create a client with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom settings over the real network.
    ///
    /// # Example
    /// ```no_run
    /// use mizan_data::edgar::{ClientConfig, RegistryClient};
    ///
    /// # fn example() -> mizan_data::Result<()> {
    /// let config = ClientConfig::default().with_user_agent("Acme Research ops@acme.test");
    /// let client = RegistryClient::with_config(config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_parts(transport, TokioPacer, config))
    }
}

impl<T: Transport, P: Pacer> RegistryClient<T, P> {
    /// Assemble a client from an explicit transport and pacer.
    pub const fn with_parts(transport: T, pacer: P, config: ClientConfig) -> Self {
        Self {
            transport,
            pacer,
            config,
        }
    }

    /// Active configuration.
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Underlying pacer.
    pub const fn pacer(&self) -> &P {
        &self.pacer
    }

    fn allowed_url(&self, url: &str) -> Result<Url> {
        let parsed = Url::parse(url).map_err(|_| DataError::DisallowedHost(url.to_string()))?;
        let host = parsed.host_str().unwrap_or_default();

        if self.config.allowed_hosts.iter().any(|h| h == host) {
            Ok(parsed)
        } else {
            Err(DataError::DisallowedHost(host.to_string()))
        }
    }

    /// Fetch a document as text.
    ///
    /// # Errors
    /// - [`DataError::DisallowedHost`] if the host is not allow-listed; no
    ///   request is made.
    /// - [`DataError::UpstreamUnavailable`] once every attempt has failed,
    ///   carrying the last failure.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        self.fetch_decoded(url, Ok).await
    }

    /// Fetch a document and decode it as JSON.
    ///
    /// A body that does not decode counts as a failed attempt. When the
    /// final attempt fails that way the error is [`DataError::Parse`].
    pub async fn fetch_json<D: DeserializeOwned>(&self, url: &str) -> Result<D> {
        self.fetch_decoded(url, |body| {
            serde_json::from_str(&body)
                .map_err(|e| DataError::Parse(format!("Invalid JSON from {}: {}", url, e)))
        })
        .await
    }

    async fn fetch_decoded<R, F>(&self, url: &str, decode: F) -> Result<R>
    where
        F: Fn(String) -> Result<R> + Send + Sync,
    {
        let parsed = self.allowed_url(url)?;
        let attempts = self.config.max_attempts;
        let unavailable = |reason: String| DataError::UpstreamUnavailable { attempts, reason };
        let mut last_failure = None;

        for attempt in 0..attempts {
            self.pacer.pause(self.config.pacing_delay(attempt)).await;

            let failure = match self.transport.get(&parsed).await {
                Ok(response) if response.is_success() => {
                    let bytes = response.body.len();
                    match decode(response.body) {
                        Ok(decoded) => {
                            debug!(url, attempt, bytes, "fetched");
                            return Ok(decoded);
                        }
                        Err(e) => {
                            warn!(url, attempt, error = %e, "undecodable body");
                            e
                        }
                    }
                }
                Ok(response) => {
                    warn!(url, attempt, status = response.status, "non-success status");
                    unavailable(format!("HTTP {}", response.status))
                }
                Err(e) => {
                    warn!(url, attempt, error = %e, "request failed");
                    unavailable(e.to_string())
                }
            };
            last_failure = Some(failure);
        }

        Err(last_failure.unwrap_or_else(|| unavailable("fetch failed".to_string())))
    }
}

impl<T, P> std::fmt::Debug for RegistryClient<T, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
