//! Error types for OnApp operations.
//!
//! Every failure is returned as a value of [`Error`]. The variants fall into
//! four classes that callers are expected to tell apart:
//!
//! - argument errors ([`Error::InvalidArgument`]) never reach the network;
//! - transport errors ([`Error::is_transport`]) mean the request may not have
//!   been delivered;
//! - API errors ([`Error::is_api`]) are non-2xx responses from the server;
//! - [`Error::LookupFailed`] means a state-changing request was accepted but
//!   the follow-up transaction lookup failed. Retrying the original request
//!   in that case can apply its effect twice.

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for OnApp operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Client-side precondition failure
    #[error("Invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        /// Name of the offending argument
        argument: String,
        /// Why it was rejected
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint or request path
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Operation timed out
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Connection to the control plane failed
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Bad request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Authentication or authorization failed (401/403)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other non-2xx response
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// Response body could not be decoded
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The action was accepted but the transaction lookup failed
    #[error("Action accepted but transaction lookup failed: {0}")]
    LookupFailed(Box<Error>),
}

/// Specialized result type for OnApp operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build an [`Error::InvalidArgument`].
    #[must_use]
    pub fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    /// Map a non-2xx status and its response body to an error.
    #[must_use]
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = api_error_message(body);
        match status {
            StatusCode::BAD_REQUEST => Self::BadRequest(message),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::CONFLICT => Self::Conflict(message),
            status => Self::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::Timeout(_) => "TIMEOUT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Api { .. } => "API_ERROR",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::LookupFailed(_) => "LOOKUP_FAILED",
        }
    }

    /// True for failures below the HTTP layer.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::ServiceUnavailable(_) | Self::HttpError(_)
        )
    }

    /// True for non-2xx responses returned by the server.
    #[must_use]
    pub const fn is_api(&self) -> bool {
        matches!(
            self,
            Self::BadRequest(_)
                | Self::Unauthorized(_)
                | Self::NotFound(_)
                | Self::Conflict(_)
                | Self::Api { .. }
        )
    }

    /// True when the server already accepted the state-changing request.
    ///
    /// Callers must not blindly retry an operation that failed this way.
    #[must_use]
    pub const fn action_accepted(&self) -> bool {
        matches!(self, Self::LookupFailed(_))
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::ConfigError(_)
                | Self::ServiceUnavailable(_)
                | Self::Api { .. }
                | Self::LookupFailed(_)
        )
    }
}

/// Extract a readable message from an OnApp error body.
///
/// OnApp reports failures as `{"errors": {"field": ["msg", ...]}}` or
/// `{"errors": ["msg", ...]}`; anything else is returned verbatim.
#[must_use]
pub fn api_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    match value.get("errors") {
        Some(serde_json::Value::Object(fields)) => fields
            .iter()
            .map(|(field, messages)| format!("{field}: {}", join_messages(messages)))
            .collect::<Vec<_>>()
            .join("; "),
        Some(messages @ serde_json::Value::Array(_)) => join_messages(messages),
        Some(serde_json::Value::String(message)) => message.clone(),
        _ => body.trim().to_string(),
    }
}

fn join_messages(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| match item {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}
