//! Registry endpoint selection and base URL parsing.

use crate::errors::{Error, Result};
use regex::Regex;
use std::fmt;

/// Accepted base URL shape: `scheme://host` with an optional trailing slash.
static URL_PATTERN: &str = r"^(?P<scheme>https?)://(?P<host>[A-Za-z0-9_.\-]*)/?$";

/// URL scheme used to reach the registry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Scheme {
    /// Plain HTTP.
    Http,
    /// HTTP over TLS.
    Https,
}

impl Scheme {
    /// Return the scheme as it appears in URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where requests are sent, as validated from configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Endpoint {
    /// No base URL configured: `https` and an empty host.
    Default,
    /// Explicit scheme and host.
    Parsed {
        /// URL scheme.
        scheme: Scheme,
        /// Bare host, without trailing slash.
        host: String,
    },
}

impl Endpoint {
    /// Validate a configured base URL.
    ///
    /// An empty string selects [`Endpoint::Default`] without parsing.
    pub fn try_from_url(url: &str) -> Result<Self> {
        if url.is_empty() {
            return Ok(Endpoint::Default);
        }
        let (scheme, host) = parse_url(url)?;
        Ok(Endpoint::Parsed { scheme, host })
    }

    /// Build an endpoint from already known components.
    ///
    /// No validation is performed, so this also accepts `host:port` pairs.
    pub fn new<S: Into<String>>(scheme: Scheme, host: S) -> Self {
        Endpoint::Parsed {
            scheme,
            host: host.into(),
        }
    }

    /// Return the URL scheme.
    pub fn scheme(&self) -> Scheme {
        match self {
            Endpoint::Default => Scheme::Https,
            Endpoint::Parsed { scheme, .. } => *scheme,
        }
    }

    /// Return the host, empty for [`Endpoint::Default`].
    pub fn host(&self) -> &str {
        match self {
            Endpoint::Default => "",
            Endpoint::Parsed { host, .. } => host,
        }
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Endpoint::Default
    }
}

/// Split a `scheme://host[/]` base URL into its scheme and host.
pub fn parse_url(url: &str) -> Result<(Scheme, String)> {
    let invalid = || Error::InvalidUrl(url.to_string());

    let pattern = Regex::new(URL_PATTERN).map_err(|e| {
        error!("could not compile regex pattern {}: {}", URL_PATTERN, e);
        invalid()
    })?;
    let captures = pattern.captures(url).ok_or_else(invalid)?;

    // Whole match, scheme and host.
    if captures.len() != 3 {
        return Err(invalid());
    }

    let scheme = match &captures["scheme"] {
        "http" => Scheme::Http,
        "https" => Scheme::Https,
        _ => return Err(invalid()),
    };
    Ok((scheme, captures["host"].to_string()))
}
