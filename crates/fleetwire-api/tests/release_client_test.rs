#![allow(clippy::unwrap_used)]
// Integration tests for `ReleaseClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fleetwire_api::{Error, ReleaseClient, TransportConfig};

async fn setup() -> (MockServer, ReleaseClient) {
    let server = MockServer::start().await;
    let base = Url::parse(&server.uri()).unwrap();
    let client = ReleaseClient::with_base_url(base, &TransportConfig::default()).unwrap();
    (server, client)
}

#[tokio::test]
async fn latest_assets_parses_release_listing() {
    let (server, client) = setup().await;

    let release = json!({
        "tag_name": "v3.4.0",
        "assets": [
            {
                "name": "xray-core_1.8.4-1_mipsel_24kc.ipk",
                "browser_download_url": "https://dl.example/xray-core_1.8.4-1_mipsel_24kc.ipk"
            },
            {
                "name": "luci-app-xray_3.4.0-1_all.ipk",
                "browser_download_url": "https://dl.example/luci-app-xray_3.4.0-1_all.ipk"
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/repos/yichya/luci-app-xray/releases/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&release))
        .mount(&server)
        .await;

    let assets = client.latest_assets("yichya/luci-app-xray").await.unwrap();
    assert_eq!(assets.len(), 2);
    assert_eq!(assets[0].name, "xray-core_1.8.4-1_mipsel_24kc.ipk");
    assert!(assets[1].browser_download_url.ends_with("_all.ipk"));
}

#[tokio::test]
async fn latest_assets_reports_http_failure() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = client.latest_assets("nobody/nothing").await;
    assert!(
        matches!(result, Err(Error::Release { .. })),
        "expected Release error, got: {result:?}"
    );
}

#[tokio::test]
async fn latest_assets_reports_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.latest_assets("a/b").await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn download_returns_asset_bytes() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/dl/pkg.ipk"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ipk-bytes".to_vec()))
        .mount(&server)
        .await;

    let bytes = client
        .download(&format!("{}/dl/pkg.ipk", server.uri()))
        .await
        .unwrap();
    assert_eq!(bytes, b"ipk-bytes");
}
