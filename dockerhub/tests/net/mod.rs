use commons::testing::init_runtime;
use dockerhub::v2::{Client, Context, ListTagsOptions, Options};
use dockerhub::ErrorKind;
use std::time::Duration;

static DOCKERHUB_REGISTRY: &str = "https://registry-1.docker.io";

fn timeout_ctx() -> Context {
    Context::background().with_timeout(Duration::from_secs(60))
}

#[test]
fn test_public_basic_auth_rejected() {
    let rt = init_runtime().unwrap();
    let repo = "library/busybox";

    // Docker Hub only accepts bearer tokens.
    let client = Client::new(Options {
        url: DOCKERHUB_REGISTRY.to_string(),
        ..Default::default()
    })
    .unwrap();

    let err = rt
        .block_on(client.list_tags(&timeout_ctx(), repo, None))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Registry);
    assert_eq!(err.api_error().unwrap().code, "UNAUTHORIZED");
    assert_eq!(err.response().unwrap().status(), 401);

    let err = rt
        .block_on(client.get_manifest(&timeout_ctx(), repo, "latest"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Registry);
    assert_eq!(err.api_error().unwrap().code, "UNAUTHORIZED");
}

#[test]
#[ignore = "needs DOCKERHUB_TEST_URL and credentials"]
fn test_private_list_tags_and_manifest() {
    let rt = init_runtime().unwrap();
    let var = |name: &str| std::env::var(name).unwrap_or_else(|_| panic!("{} missing", name));
    let repo = var("DOCKERHUB_TEST_REPOSITORY");

    let client = Client::new(Options {
        url: var("DOCKERHUB_TEST_URL"),
        username: var("DOCKERHUB_TEST_USERNAME"),
        password: var("DOCKERHUB_TEST_PASSWORD"),
        ..Default::default()
    })
    .unwrap();

    let options = ListTagsOptions { number: 5 };
    let (tags, raw) = rt
        .block_on(client.list_tags(&timeout_ctx(), &repo, Some(&options)))
        .unwrap();
    assert_eq!(raw.status(), 200);
    assert_eq!(tags.name, repo);

    let tag = tags.tags.first().expect("repository has no tags");
    let (manifest, _) = rt
        .block_on(client.get_manifest(&timeout_ctx(), repo.as_str(), tag.as_str()))
        .unwrap();
    assert!(manifest.schema_version >= 1);
}
