//! Tags API.

use super::response::de_null_default;
use super::{Client, Context, RawResponse};
use crate::errors::Result;

/// Options for listing tags.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct ListTagsOptions {
    /// Page size hint, sent as the `n` query parameter when non-zero.
    ///
    /// Registries do not reliably honor it
    /// (<https://github.com/docker/distribution/issues/1936>), so this is
    /// forwarded as-is and no pagination is attempted.
    pub number: usize,
}

/// Tags of a repository, in the order returned by the registry.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct TagList {
    /// Repository name.
    pub name: String,
    /// Tag names.
    #[serde(deserialize_with = "de_null_default")]
    pub tags: Vec<String>,
}

impl Client {
    /// List the tags of repository `name`.
    pub async fn list_tags<S: AsRef<str>>(
        &self,
        ctx: &Context,
        name: S,
        options: Option<&ListTagsOptions>,
    ) -> Result<(TagList, RawResponse)> {
        let url = self.url(format_args!("/v2/{}/tags/list", name.as_ref()));
        let query = match options {
            Some(opts) if opts.number != 0 => vec![("n", opts.number.to_string())],
            _ => vec![],
        };

        self.get(ctx, url, &query).await
    }
}
