//! Registry response envelope.

use super::RawResponse;
use crate::errors::{ApiError, Error, Result};
use serde::{Deserialize, Deserializer};

/// Response body: the expected payload plus the protocol error list.
///
/// Registries may report failures in the body with any status code, so
/// [`Response::error`] has to be checked before the payload is trusted.
#[derive(Debug, Deserialize)]
pub struct Response<T> {
    /// Payload fields.
    #[serde(flatten)]
    pub payload: T,
    /// Errors declared by the registry.
    #[serde(default, deserialize_with = "de_null_default")]
    pub errors: Vec<ApiError>,
}

impl<T> Response<T> {
    /// Return the first declared error, if any.
    pub fn error(&self) -> Option<&ApiError> {
        self.errors.first()
    }

    /// Turn the envelope into the payload, or the first declared error.
    pub(crate) fn into_result(self, raw: RawResponse) -> Result<(T, RawResponse)> {
        if let Some(error) = self.error() {
            debug!(
                "registry reported {} error(s) with status {}, first: {}",
                self.errors.len(),
                raw.status(),
                error
            );
            return Err(Error::Registry {
                error: error.clone(),
                response: raw,
            });
        }
        Ok((self.payload, raw))
    }
}

/// Deserialize a `null` value as the type default.
pub(crate) fn de_null_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let value = Option::<T>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
