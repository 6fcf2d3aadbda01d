//! Docker Registry HTTP API v2 client.

use crate::errors::{RequestError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use custom_debug_derive::Debug as CustomDebug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use std::fmt;

mod context;
pub use self::context::Context;

mod endpoint;
pub use self::endpoint::{parse_url, Endpoint, Scheme};

mod manifest;
pub use self::manifest::{Descriptor, FsLayer, History, Manifest, Platform};

mod response;
pub use self::response::Response;

mod session;
use self::session::Session;
pub use self::session::RawResponse;

mod tag;
pub use self::tag::{ListTagsOptions, TagList};

/// Client configuration.
///
/// A non-empty `auth_token` takes precedence over `username` and `password`.
#[derive(Clone, CustomDebug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Options {
    /// Registry base address (`scheme://host`), empty for the default endpoint.
    pub url: String,
    /// Basic-auth username.
    pub username: String,
    /// Basic-auth password.
    #[debug(skip)]
    pub password: String,
    /// Pre-encoded basic-auth token.
    #[debug(skip)]
    pub auth_token: String,
}

/// Credentials sent as HTTP basic authentication.
#[derive(Clone, PartialEq)]
pub enum Credentials {
    /// Already encoded `base64(username:password)` token, used verbatim.
    Token(String),
    /// Username and password pair, encoded on use.
    Basic {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },
}

impl Credentials {
    /// Pick credentials out of client options.
    ///
    /// Empty username and password are accepted as-is.
    pub fn from_options(options: &Options) -> Self {
        if options.auth_token.is_empty() {
            Credentials::Basic {
                username: options.username.clone(),
                password: options.password.clone(),
            }
        } else {
            Credentials::Token(options.auth_token.clone())
        }
    }

    /// Return the basic-auth token.
    pub fn token(&self) -> String {
        match self {
            Credentials::Token(token) => token.clone(),
            Credentials::Basic { username, password } => {
                BASE64.encode(format!("{}:{}", username, password))
            }
        }
    }

    /// Return the `Authorization` header value.
    pub fn authorization(&self) -> String {
        format!("Basic {}", self.token())
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Credentials::Basic {
            username: String::new(),
            password: String::new(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Token(_) => f.write_str("Token(..)"),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
        }
    }
}

/// Client to make outgoing API requests to a registry.
///
/// The client is immutable once built and cheap to clone; clones share the
/// underlying connection pool.
#[derive(Clone, CustomDebug)]
pub struct Client {
    /// Registry scheme and host.
    endpoint: Endpoint,
    /// `Authorization` header value sent with every request.
    #[debug(skip)]
    authorization: String,
    /// HTTP session carrying the fixed headers.
    session: Session,
}

impl Client {
    /// Build a client from configuration options.
    pub fn new(options: Options) -> Result<Self> {
        Self::builder().options(options).build()
    }

    /// Return a client builder with default options.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Return the registry endpoint.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Return the URL scheme.
    pub fn scheme(&self) -> Scheme {
        self.endpoint.scheme()
    }

    /// Return the registry host.
    pub fn host(&self) -> &str {
        self.endpoint.host()
    }

    /// Return the `Authorization` header value sent with every request.
    pub fn authorization(&self) -> &str {
        &self.authorization
    }

    /// Format an absolute URL for `path` on this registry.
    ///
    /// This is plain string formatting; the result is not validated.
    pub fn url(&self, path: fmt::Arguments<'_>) -> String {
        format!("{}://{}{}", self.scheme(), self.host(), path)
    }

    /// GET `url` and unwrap the registry envelope around `T`.
    pub(crate) async fn get<T>(
        &self,
        ctx: &Context,
        url: String,
        query: &[(&str, String)],
    ) -> Result<(T, RawResponse)>
    where
        T: DeserializeOwned,
    {
        let (envelope, raw) = self
            .session
            .get_json::<Response<T>>(ctx, &url, query)
            .await?;
        envelope.into_result(raw)
    }
}

/// Client builder.
#[derive(Clone, CustomDebug, Default)]
pub struct ClientBuilder {
    url: Option<String>,
    endpoint: Option<Endpoint>,
    credentials: Option<Credentials>,
    #[debug(skip)]
    hclient: Option<reqwest::Client>,
}

impl ClientBuilder {
    /// Set base URL and credentials from configuration options.
    pub fn options(self, options: Options) -> Self {
        let credentials = Credentials::from_options(&options);
        self.url(Some(options.url)).credentials(Some(credentials))
    }

    /// Set (or reset) the registry base URL, validated on build.
    pub fn url(self, url: Option<String>) -> Self {
        let mut builder = self;
        builder.url = url;
        builder
    }

    /// Set (or reset) an explicit endpoint, taking precedence over the URL.
    pub fn endpoint(self, endpoint: Option<Endpoint>) -> Self {
        let mut builder = self;
        builder.endpoint = endpoint;
        builder
    }

    /// Set (or reset) the credentials to use.
    pub fn credentials(self, credentials: Option<Credentials>) -> Self {
        let mut builder = self;
        builder.credentials = credentials;
        builder
    }

    /// Set (or reset) the HTTP client to use.
    pub fn http_client(self, hclient: Option<reqwest::Client>) -> Self {
        let mut builder = self;
        builder.hclient = hclient;
        builder
    }

    /// Build a client with specified parameters.
    pub fn build(self) -> Result<Client> {
        let endpoint = match (self.endpoint, self.url) {
            (Some(endpoint), _) => endpoint,
            (None, Some(url)) => Endpoint::try_from_url(&url)?,
            (None, None) => Endpoint::Default,
        };

        let authorization = self.credentials.unwrap_or_default().authorization();
        let mut auth_value =
            HeaderValue::from_str(&authorization).map_err(RequestError::InvalidHeader)?;
        auth_value.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth_value);

        let session = match self.hclient {
            Some(hclient) => Session::with_client(hclient, headers),
            None => Session::new(headers)?,
        };

        Ok(Client {
            endpoint,
            authorization,
            session,
        })
    }
}
