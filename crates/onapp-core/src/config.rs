//! Configuration structures for OnApp clients.
//!
//! [`OnAppClientConfig`] can be built in code or deserialized from any serde
//! format; it is validated before a client is built from it.

use crate::Error;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Default number of transactions fetched when correlating an action.
pub const DEFAULT_TRANSACTION_PAGE_SIZE: u32 = 100;

/// Configuration for an OnApp client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OnAppClientConfig {
    /// Control-plane base URL (e.g. `https://cloud.example.com`)
    #[validate(url)]
    pub url: String,

    /// Login used for HTTP basic authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,

    /// Password or API key used for HTTP basic authentication
    #[serde(default, skip_serializing)]
    pub password: Option<SecretString>,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Optional transport-level request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Page size used when looking up the transaction behind an action
    #[validate(range(min = 1, max = 1000))]
    #[serde(default = "default_transaction_page_size")]
    pub transaction_page_size: u32,
}

const fn default_tls_verify() -> bool {
    true
}

const fn default_transaction_page_size() -> u32 {
    DEFAULT_TRANSACTION_PAGE_SIZE
}

impl OnAppClientConfig {
    /// Create a new client configuration with required parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            url: url.into(),
            ..Self::default()
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Set basic authentication credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.login = Some(login.into());
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set a transport-level request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = Some(seconds);
        self
    }

    /// Set the transaction lookup page size.
    #[must_use]
    pub const fn with_transaction_page_size(mut self, per_page: u32) -> Self {
        self.transaction_page_size = per_page;
        self
    }

    /// Get the request timeout as a Duration, if set.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Parse and validate the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_url(&self) -> Result<Url, Error> {
        Url::parse(&self.url).map_err(|e| Error::ConfigError(format!("Invalid OnApp URL: {e}")))
    }
}

impl Default for OnAppClientConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000".to_string(),
            login: None,
            password: None,
            tls_verify: default_tls_verify(),
            request_timeout_secs: None,
            transaction_page_size: default_transaction_page_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_config_new() {
        let config = OnAppClientConfig::new("https://cloud.example.com").unwrap();
        assert_eq!(config.url, "https://cloud.example.com");
        assert!(config.tls_verify);
        assert!(config.timeout().is_none());
        assert_eq!(config.transaction_page_size, DEFAULT_TRANSACTION_PAGE_SIZE);
    }

    #[test]
    fn test_config_invalid_url() {
        let result = OnAppClientConfig::new("not-a-url");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_config_builder() {
        let config = OnAppClientConfig::new("https://cloud.example.com")
            .unwrap()
            .with_credentials("admin", "s3cret")
            .with_tls_verify(false)
            .with_timeout(60)
            .with_transaction_page_size(25);

        assert_eq!(config.login.as_deref(), Some("admin"));
        assert_eq!(
            config.password.as_ref().map(|p| p.expose_secret().to_string()),
            Some("s3cret".to_string())
        );
        assert!(!config.tls_verify);
        assert_eq!(config.timeout(), Some(Duration::from_secs(60)));
        assert_eq!(config.transaction_page_size, 25);
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: OnAppClientConfig = serde_json::from_str(
            r#"{"url": "https://cloud.example.com", "login": "admin", "password": "pw"}"#,
        )
        .unwrap();
        assert!(config.tls_verify);
        assert_eq!(config.transaction_page_size, 100);
        assert!(config.password.is_some());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_password_not_serialized() {
        let config = OnAppClientConfig::new("https://cloud.example.com")
            .unwrap()
            .with_credentials("admin", "hunter2");
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("admin"));
        assert!(!json.contains("hunter2"));
        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn test_config_validation_ranges() {
        let mut config = OnAppClientConfig::default();
        config.request_timeout_secs = Some(0);
        assert!(config.validate().is_err());

        config.request_timeout_secs = Some(30);
        config.transaction_page_size = 0;
        assert!(config.validate().is_err());

        config.transaction_page_size = 1001;
        assert!(config.validate().is_err());

        config.transaction_page_size = 50;
        assert!(config.validate().is_ok());
    }
}
