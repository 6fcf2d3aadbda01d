//! HTTP session with a fixed set of headers.

use super::Context;
use crate::errors::RequestError;
use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

/// Status and headers of a registry response.
///
/// This is kept after the body has been consumed, so callers can inspect
/// the response on success and on registry-reported errors.
#[derive(Clone, Debug)]
pub struct RawResponse {
    url: Url,
    status: StatusCode,
    headers: HeaderMap,
}

impl RawResponse {
    /// Final URL of the response, after redirects.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl From<&reqwest::Response> for RawResponse {
    fn from(response: &reqwest::Response) -> Self {
        Self {
            url: response.url().clone(),
            status: response.status(),
            headers: response.headers().clone(),
        }
    }
}

/// Reusable HTTP session.
#[derive(Clone, Debug)]
pub(crate) struct Session {
    hclient: reqwest::Client,
    /// Headers attached to each request, empty when they are client defaults.
    headers: HeaderMap,
}

impl Session {
    /// Build a session sending `headers` with every request.
    pub(crate) fn new(headers: HeaderMap) -> Result<Self, RequestError> {
        let hclient = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .build()
            .map_err(RequestError::Build)?;
        Ok(Self {
            hclient,
            headers: HeaderMap::new(),
        })
    }

    /// Wrap an existing HTTP client, attaching `headers` to every request.
    pub(crate) fn with_client(hclient: reqwest::Client, headers: HeaderMap) -> Self {
        Self { hclient, headers }
    }

    /// GET `url` and decode the JSON body, whatever the status code.
    pub(crate) async fn get_json<T>(
        &self,
        ctx: &Context,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<(T, RawResponse), RequestError>
    where
        T: DeserializeOwned,
    {
        trace!("url: '{}', query: {:?}", url, query);
        let mut request = self.hclient.get(url).headers(self.headers.clone());
        if !query.is_empty() {
            request = request.query(query);
        }

        ctx.run(async move {
            let response = request.send().await.map_err(RequestError::Transport)?;
            let raw = RawResponse::from(&response);
            debug!("GET '{}' returned {}", raw.url(), raw.status());

            let body = response.bytes().await.map_err(RequestError::Transport)?;
            let value = serde_json::from_slice(&body)?;
            Ok((value, raw))
        })
        .await
    }
}
