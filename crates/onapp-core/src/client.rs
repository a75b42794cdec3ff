//! HTTP service client shared by every OnApp resource client.
//!
//! A [`ServiceClient`] is a cheap, cloneable handle over a pooled
//! `reqwest::Client`. Resource clients are constructed from it so a single
//! connection pool and credential set can be injected everywhere. Each call is
//! a single round trip: there is no retry, caching or request ordering here.

use crate::config::{OnAppClientConfig, DEFAULT_TRANSACTION_PAGE_SIZE};
use crate::error::{Error, Result};
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Format suffix appended to every resource path.
pub const API_FORMAT: &str = ".json";

/// Default user agent sent with every request.
pub const USER_AGENT: &str = concat!("onapp-rust/", env!("CARGO_PKG_VERSION"));

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Default TCP connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

/// Path of a collection, e.g. `instance_packages.json`.
#[must_use]
pub fn collection_path(base: &str) -> String {
    format!("{base}{API_FORMAT}")
}

/// Path of a single member, e.g. `instance_packages/7.json`.
#[must_use]
pub fn member_path(base: &str, id: i64) -> String {
    format!("{base}/{id}{API_FORMAT}")
}

/// HTTP client configuration.
///
/// Configures transport behavior: connection pooling, compression and an
/// optional request timeout. No timeout is applied unless one is set; callers
/// normally bound calls with their own deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Optional request timeout
    pub timeout: Option<Duration>,

    /// TCP connect timeout
    pub connect_timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable response compression
    pub enable_compression: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: None,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_compression: true,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set TCP connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ServiceClient`].
#[derive(Debug, Clone)]
pub struct ServiceClientBuilder {
    base_url: Url,
    http_config: ClientConfig,
    user_agent: String,
    basic_auth: Option<(String, SecretString)>,
    tls_verify: bool,
    transaction_page_size: u32,
}

impl ServiceClientBuilder {
    /// Create a builder for the specified base URL.
    ///
    /// The URL should include the protocol and hostname
    /// (e.g. `https://cloud.example.com`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the URL cannot be parsed.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(base_url.as_ref()).map_err(|err| {
            Error::ConfigError(format!(
                "Invalid OnApp base URL `{}`: {err}",
                base_url.as_ref()
            ))
        })?;

        Ok(Self {
            base_url: with_trailing_slash(url),
            http_config: ClientConfig::new(),
            user_agent: USER_AGENT.to_string(),
            basic_auth: None,
            tls_verify: true,
            transaction_page_size: DEFAULT_TRANSACTION_PAGE_SIZE,
        })
    }

    /// Create a builder from a validated [`OnAppClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn from_config(config: &OnAppClientConfig) -> Result<Self> {
        validator::Validate::validate(config)?;

        let mut builder = Self::new(config.parse_url()?.as_str())?
            .with_tls_verify(config.tls_verify)
            .with_transaction_page_size(config.transaction_page_size);

        if let Some(timeout) = config.timeout() {
            builder.http_config = builder.http_config.with_timeout(timeout);
        }
        if let (Some(login), Some(password)) = (&config.login, &config.password) {
            builder.basic_auth = Some((login.clone(), password.clone()));
        }

        Ok(builder)
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Override the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Configure HTTP basic authentication credentials.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.basic_auth = Some((username.into(), SecretString::from(password.into())));
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set the page size used when looking up transactions.
    #[must_use]
    pub const fn with_transaction_page_size(mut self, per_page: u32) -> Self {
        self.transaction_page_size = per_page;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the HTTP client cannot be built.
    pub fn build(self) -> Result<ServiceClient> {
        let mut builder = ClientBuilder::new()
            .user_agent(self.user_agent)
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host)
            .connect_timeout(self.http_config.connect_timeout);

        if let Some(timeout) = self.http_config.timeout {
            builder = builder.timeout(timeout);
        }
        if !self.http_config.enable_compression {
            builder = builder.no_gzip();
        }
        if !self.tls_verify {
            warn!("TLS verification disabled for OnApp client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        Ok(ServiceClient {
            http,
            base_url: self.base_url,
            basic_auth: self.basic_auth,
            transaction_page_size: self.transaction_page_size,
        })
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Shared transport handle for OnApp resource clients.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: Client,
    base_url: Url,
    basic_auth: Option<(String, SecretString)>,
    transaction_page_size: u32,
}

impl ServiceClient {
    /// Construct a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        ServiceClientBuilder::new(base_url)?.build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Page size used when looking up transactions.
    #[must_use]
    pub const fn transaction_page_size(&self) -> u32 {
        self.transaction_page_size
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        let normalized = path.strip_prefix('/').unwrap_or(path);

        self.base_url
            .join(normalized)
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid OnApp path `{path}`: {err}")))
    }

    /// Issue one request and return the response if its status is 2xx.
    ///
    /// `configure` may attach headers or a body to the request.
    ///
    /// # Errors
    ///
    /// Transport failures and non-2xx statuses are returned as errors.
    pub async fn execute<F>(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
        configure: F,
    ) -> Result<Response>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = self.build_url(path)?;
        let mut request = self
            .http
            .request(method.clone(), url)
            .query(params)
            .header("Accept", "application/json");

        if let Some((user, pass)) = &self.basic_auth {
            request = request.basic_auth(user, Some(pass.expose_secret()));
        }
        request = configure(request);

        debug!(%method, path, ?params, "OnApp request");

        let response = request.send().await.map_err(|err| {
            let error = Error::from(err);
            if error.should_log() {
                warn!(%method, path, %error, "OnApp request failed");
            }
            error
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let error = Error::from_status(status, &text);
        if error.should_log() {
            warn!(%method, path, %status, %error, "OnApp request rejected");
        } else {
            debug!(%method, path, %status, "OnApp request rejected");
        }
        Err(error)
    }

    /// GET a path and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ServiceClient::execute`]; decoding failures become
    /// [`Error::ParseError`].
    pub async fn get_json<R>(&self, path: &str, params: &[(&'static str, String)]) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.send_json::<(), R>(Method::GET, path, None, params)
            .await
    }

    /// Send an optional JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ServiceClient::execute`]; decoding failures become
    /// [`Error::ParseError`].
    pub async fn send_json<B, R>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        params: &[(&'static str, String)],
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .execute(method, path, params, |request| attach_body(request, body))
            .await?;

        response.json::<R>().await.map_err(|err| {
            Error::ParseError(format!("Failed to parse OnApp response for `{path}`: {err}"))
        })
    }

    /// Send an optional JSON body; success is signalled by the status alone.
    ///
    /// # Errors
    ///
    /// See [`ServiceClient::execute`].
    pub async fn send_status<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        params: &[(&'static str, String)],
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.execute(method, path, params, |request| attach_body(request, body))
            .await
            .map(|_| ())
    }
}

fn attach_body<B>(request: RequestBuilder, body: Option<&B>) -> RequestBuilder
where
    B: Serialize + ?Sized,
{
    match body {
        Some(payload) => request.json(payload),
        None => request,
    }
}
