//! Error types for registry operations.

use crate::v2::RawResponse;
use std::fmt;

/// Result alias used across this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The configured base URL does not match `scheme://host[/]`.
    InvalidUrl,
    /// Transport-level failure, cancellation, timeout or undecodable body.
    Request,
    /// The registry answered with a well-formed error envelope.
    Registry,
}

/// Errors returned by the registry client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid base URL in the client configuration.
    #[error("invalid registry URL '{0}', expected scheme://host[/]")]
    InvalidUrl(String),

    /// The request could not be completed.
    #[error("request failed: {0}")]
    Request(#[from] RequestError),

    /// The registry reported an error in the response body.
    ///
    /// Only the first reported error is kept. The raw response is attached so
    /// callers can look at the status code and headers.
    #[error("{error}")]
    Registry {
        /// First error entry of the response envelope.
        error: ApiError,
        /// Response the error was extracted from.
        response: RawResponse,
    },
}

impl Error {
    /// Return the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidUrl(_) => ErrorKind::InvalidUrl,
            Error::Request(_) => ErrorKind::Request,
            Error::Registry { .. } => ErrorKind::Registry,
        }
    }

    /// Return the registry-declared error, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Registry { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Return the raw response this error was read from, if any.
    ///
    /// Transport failures never carry a response.
    pub fn response(&self) -> Option<&RawResponse> {
        match self {
            Error::Registry { response, .. } => Some(response),
            _ => None,
        }
    }
}

/// Causes of a failed request.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The underlying HTTP client could not be initialized.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Credentials do not form a valid `Authorization` header.
    #[error("invalid Authorization header value: {0}")]
    InvalidHeader(#[source] reqwest::header::InvalidHeaderValue),

    /// Connection, protocol or body transfer failure.
    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    /// The body is not the expected JSON document.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The caller canceled the request context.
    #[error("request canceled")]
    Canceled,

    /// The request context deadline elapsed.
    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

/// Single entry of the registry error envelope.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ApiError {
    /// Error code, e.g. `UNAUTHORIZED` or `MANIFEST_UNKNOWN`.
    #[serde(default)]
    pub code: String,
    /// Human readable message.
    #[serde(default)]
    pub message: String,
    /// Unstructured details, when the registry sends any.
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
