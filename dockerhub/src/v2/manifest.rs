//! Manifest API.

use super::response::de_null_default;
use super::{Client, Context, RawResponse};
use crate::errors::Result;

/// Image manifest, any schema version.
///
/// Schema 1 manifests fill `fs_layers` and `history`; schema 2 and OCI
/// manifests fill `config` and `layers`; manifest lists and OCI indexes fill
/// `manifests`. Fields missing from the document are left empty.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Manifest {
    /// Manifest schema version.
    pub schema_version: u32,
    /// Manifest media type, when declared in the body.
    pub media_type: Option<String>,
    /// Repository name (schema 1).
    pub name: Option<String>,
    /// Tag (schema 1).
    pub tag: Option<String>,
    /// Image architecture (schema 1).
    pub architecture: Option<String>,
    /// Layer blob references (schema 1).
    #[serde(deserialize_with = "de_null_default")]
    pub fs_layers: Vec<FsLayer>,
    /// V1-compatible history entries (schema 1).
    #[serde(deserialize_with = "de_null_default")]
    pub history: Vec<History>,
    /// Image configuration blob.
    pub config: Option<Descriptor>,
    /// Layer blobs.
    #[serde(deserialize_with = "de_null_default")]
    pub layers: Vec<Descriptor>,
    /// Per-platform manifests of a list or index.
    #[serde(deserialize_with = "de_null_default")]
    pub manifests: Vec<Descriptor>,
}

impl Manifest {
    /// Return layer digests, from base to top layer.
    ///
    /// Schema 1 lists layers from top to base, so their order is reversed.
    pub fn layer_digests(&self) -> Vec<&str> {
        if self.schema_version == 1 {
            self.fs_layers
                .iter()
                .rev()
                .map(|layer| layer.blob_sum.as_str())
                .collect()
        } else {
            self.layers
                .iter()
                .map(|layer| layer.digest.as_str())
                .collect()
        }
    }
}

/// Schema 1 layer reference.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FsLayer {
    /// Layer digest.
    pub blob_sum: String,
}

/// Schema 1 history entry.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct History {
    /// Serialized V1 image JSON.
    pub v1_compatibility: String,
}

/// Content descriptor.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Descriptor {
    /// Media type of the referenced content.
    pub media_type: String,
    /// Size in bytes.
    pub size: u64,
    /// Content digest.
    pub digest: String,
    /// Alternate download locations.
    #[serde(deserialize_with = "de_null_default")]
    pub urls: Vec<String>,
    /// Target platform, for entries of a manifest list.
    pub platform: Option<Platform>,
}

/// Platform of a manifest list entry.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct Platform {
    /// CPU architecture.
    pub architecture: String,
    /// Operating system.
    pub os: String,
    /// CPU variant.
    pub variant: Option<String>,
}

impl Client {
    /// Fetch the manifest of `name` identified by `reference`.
    ///
    /// `reference` is a tag or a digest; it is sent verbatim.
    pub async fn get_manifest<S: AsRef<str>>(
        &self,
        ctx: &Context,
        name: S,
        reference: S,
    ) -> Result<(Manifest, RawResponse)> {
        let url = self.url(format_args!(
            "/v2/{}/manifests/{}",
            name.as_ref(),
            reference.as_ref()
        ));

        self.get(ctx, url, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::v2::{Endpoint, Scheme};
    use crate::{Error, ErrorKind, RequestError};
    use commons::testing::{self, init_runtime};
    use commons::Fallible;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    static SCHEMA1_MANIFEST: &str = r#"{
        "schemaVersion": 1,
        "name": "library/nginx",
        "tag": "latest",
        "architecture": "amd64",
        "fsLayers": [
            {"blobSum": "sha256:top"},
            {"blobSum": "sha256:base"}
        ],
        "history": [
            {"v1Compatibility": "{\"id\":\"top\"}"},
            {"v1Compatibility": "{\"id\":\"base\"}"}
        ],
        "signatures": []
    }"#;

    static SCHEMA2_MANIFEST: &str = r#"{
        "schemaVersion": 2,
        "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
        "config": {
            "mediaType": "application/vnd.docker.container.image.v1+json",
            "size": 7023,
            "digest": "sha256:config"
        },
        "layers": [
            {
                "mediaType": "application/vnd.docker.image.rootfs.diff.tar.gzip",
                "size": 32654,
                "digest": "sha256:base"
            },
            {
                "mediaType": "application/vnd.docker.image.rootfs.diff.tar.gzip",
                "size": 16724,
                "digest": "sha256:top"
            }
        ]
    }"#;

    fn mock_client(host: String) -> Fallible<Client> {
        let client = Client::builder()
            .endpoint(Some(Endpoint::new(Scheme::Http, host)))
            .build()?;
        Ok(client)
    }

    #[test]
    fn deserialize_schema1() -> Fallible<()> {
        let manifest: Manifest = serde_json::from_str(SCHEMA1_MANIFEST)?;

        assert_eq!(manifest.schema_version, 1);
        assert_eq!(manifest.name.as_deref(), Some("library/nginx"));
        assert_eq!(manifest.history.len(), 2);
        assert_eq!(manifest.layer_digests(), vec!["sha256:base", "sha256:top"]);
        assert!(manifest.config.is_none());
        Ok(())
    }

    #[test]
    fn deserialize_schema2() -> Fallible<()> {
        let manifest: Manifest = serde_json::from_str(SCHEMA2_MANIFEST)?;

        let expected_config = Descriptor {
            media_type: "application/vnd.docker.container.image.v1+json".to_string(),
            size: 7023,
            digest: "sha256:config".to_string(),
            ..Default::default()
        };
        assert_eq!(manifest.config, Some(expected_config));
        assert_eq!(manifest.layer_digests(), vec!["sha256:base", "sha256:top"]);
        assert!(manifest.fs_layers.is_empty());
        Ok(())
    }

    #[test]
    fn deserialize_manifest_list() -> Fallible<()> {
        let input = r#"{
            "schemaVersion": 2,
            "mediaType": "application/vnd.docker.distribution.manifest.list.v2+json",
            "manifests": [
                {
                    "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
                    "size": 1570,
                    "digest": "sha256:amd64",
                    "platform": {"architecture": "amd64", "os": "linux"}
                },
                {
                    "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
                    "size": 1570,
                    "digest": "sha256:arm64",
                    "platform": {"architecture": "arm64", "os": "linux", "variant": "v8"}
                }
            ]
        }"#;

        let manifest: Manifest = serde_json::from_str(input)?;
        let platforms: Vec<Platform> = manifest
            .manifests
            .into_iter()
            .filter_map(|entry| entry.platform)
            .collect();
        assert_eq!(
            platforms,
            vec![
                Platform {
                    architecture: "amd64".to_string(),
                    os: "linux".to_string(),
                    variant: None,
                },
                Platform {
                    architecture: "arm64".to_string(),
                    os: "linux".to_string(),
                    variant: Some("v8".to_string()),
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn get_manifest_by_tag() -> Fallible<()> {
        let rt = init_runtime()?;
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/v2/library/nginx/manifests/latest")
            .match_header("authorization", "Basic Og==")
            .with_status(200)
            .with_header("docker-content-digest", "sha256:manifest")
            .with_body(SCHEMA2_MANIFEST)
            .create();

        let client = mock_client(server.host_with_port())?;
        let ctx = Context::background();
        let (manifest, raw) =
            rt.block_on(client.get_manifest(&ctx, "library/nginx", "latest"))?;

        mock.assert();
        assert_eq!(manifest.schema_version, 2);
        assert_eq!(manifest.layers.len(), 2);
        assert_eq!(
            raw.url().as_str(),
            format!("{}/v2/library/nginx/manifests/latest", server.url())
        );
        assert_eq!(raw.headers()["docker-content-digest"], "sha256:manifest");
        Ok(())
    }

    #[test]
    fn get_manifest_by_digest() -> Fallible<()> {
        let rt = init_runtime()?;
        let digest = "sha256:0d17b565c37bcbd895e9d92315a05c1c3c9a29f762b011a10c54a66cd53c9b31";
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", format!("/v2/library/nginx/manifests/{}", digest).as_str())
            .with_status(200)
            .with_body(SCHEMA1_MANIFEST)
            .create();

        let client = mock_client(server.host_with_port())?;
        let ctx = Context::background();
        let (manifest, _) = rt.block_on(client.get_manifest(&ctx, "library/nginx", digest))?;

        mock.assert();
        assert_eq!(manifest.tag.as_deref(), Some("latest"));
        Ok(())
    }

    #[test]
    fn get_manifest_registry_error() -> Fallible<()> {
        let rt = init_runtime()?;
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/v2/library/nginx/manifests/latest")
            .with_status(401)
            .with_body(testing::registry_error_body("UNAUTHORIZED", "access denied"))
            .create();

        let client = mock_client(server.host_with_port())?;
        let ctx = Context::background();
        let err = rt
            .block_on(client.get_manifest(&ctx, "library/nginx", "latest"))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Registry);
        assert_eq!(err.to_string(), "UNAUTHORIZED: access denied");
        assert_eq!(err.response().map(|raw| raw.status().as_u16()), Some(401));
        Ok(())
    }

    #[test]
    fn get_manifest_unknown() -> Fallible<()> {
        let rt = init_runtime()?;
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/v2/library/nginx/manifests/missing")
            .with_status(404)
            .with_body(testing::registry_error_body(
                "MANIFEST_UNKNOWN",
                "manifest unknown",
            ))
            .create();

        let client = mock_client(server.host_with_port())?;
        let ctx = Context::background();
        let err = rt
            .block_on(client.get_manifest(&ctx, "library/nginx", "missing"))
            .unwrap_err();

        assert_eq!(
            err.api_error().map(|e| e.code.as_str()),
            Some("MANIFEST_UNKNOWN")
        );
        Ok(())
    }

    #[test]
    fn get_manifest_canceled_before_send() -> Fallible<()> {
        let rt = init_runtime()?;
        let addr = testing::unresponsive_server(&rt)?;
        let client = mock_client(addr.to_string())?;

        let ctx = Context::background().with_timeout(Duration::from_secs(30));
        ctx.cancel();

        let err = rt
            .block_on(client.get_manifest(&ctx, "library/nginx", "latest"))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Request);
        assert!(matches!(err, Error::Request(RequestError::Canceled)));
        Ok(())
    }
}
