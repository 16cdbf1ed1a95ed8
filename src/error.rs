//! Error types
//!
//! Every adapter, the URL parser and the operation waiter return [`Error`].
//! Failures are surfaced to the caller untranslated; the only unwrapping
//! performed is for operations that finish with an embedded error payload.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// HTTP status used for missing resources.
pub const STATUS_NOT_FOUND: u16 = 404;
/// HTTP status used when a resource already exists.
pub const STATUS_CONFLICT: u16 = 409;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why a [`Context`](crate::Context) stopped an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelCause {
    Canceled,
    DeadlineExceeded,
}

impl fmt::Display for CancelCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelCause::Canceled => f.write_str("context canceled"),
            CancelCause::DeadlineExceeded => f.write_str("context deadline exceeded"),
        }
    }
}

/// One entry of an operation's embedded error payload.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct OperationErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub message: String,
}

fn summarize(details: &[OperationErrorDetail]) -> String {
    if details.is_empty() {
        return "unknown error".to_string();
    }
    details
        .iter()
        .map(|d| format!("{}: {}", d.code, d.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Malformed resource locator.
    #[error("{0:?} is not a valid resource URL")]
    InvalidFormat(String),

    /// Error reported by the API (or the mock) with an HTTP status code.
    #[error("googleapi: Error {code}: {message}")]
    Api { code: u16, message: String },

    /// The rate limiter refused the call.
    #[error("rate limited: {0}")]
    Throttled(String),

    /// An asynchronous operation reached DONE with an error payload.
    #[error("operation {name} failed: {}", summarize(.details))]
    OperationFailed {
        name: String,
        code: Option<u16>,
        details: Vec<OperationErrorDetail>,
    },

    #[error("transport error: {0}")]
    Transport(#[source] Arc<reqwest::Error>),

    #[error("failed to decode response: {0}")]
    Decode(#[source] Arc<serde_json::Error>),

    #[error("authentication failed: {0}")]
    Auth(#[source] Arc<gcp_auth::Error>),

    #[error("{0}")]
    Cancelled(CancelCause),

    #[error("{0}")]
    NotImplemented(String),

    #[error("{service} has no method {method}")]
    UnknownMethod { service: String, method: String },

    #[error("key {key} cannot address {service}")]
    InvalidKey { service: String, key: String },

    #[error("invalid object: {0}")]
    InvalidObject(String),

    #[error("registry: {0}")]
    Registry(String),
}

impl Error {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::Api {
            code: STATUS_NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::Api {
            code: STATUS_CONFLICT,
            message: message.into(),
        }
    }

    /// HTTP-style status carried by the error, if any.
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Api { code, .. } => Some(*code),
            Self::OperationFailed { code, .. } => *code,
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code() == Some(STATUS_NOT_FOUND)
    }

    pub fn is_already_exists(&self) -> bool {
        self.code() == Some(STATUS_CONFLICT)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(Arc::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(Arc::new(err))
    }
}

impl From<gcp_auth::Error> for Error {
    fn from(err: gcp_auth::Error) -> Self {
        Self::Auth(Arc::new(err))
    }
}
