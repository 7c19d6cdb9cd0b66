// ── VPN client package install ──
//
// Fetches the latest release of the proxy client packages, downloads the
// installable artifacts into a temporary directory, and installs them in a
// single batch so the package manager resolves the cross-dependencies
// itself. The directory is removed when it drops, install outcome aside.

use fleetwire_api::{ReleaseAsset, ReleaseClient};
use tracing::{debug, info};

use crate::error::CoreError;
use crate::runner::Runner;

const PACKAGE_SUFFIX: &str = ".ipk";
const PACKAGE_PREFIXES: [&str; 2] = ["xray-core", "luci-app-xray"];

fn is_vpn_package(asset: &ReleaseAsset) -> bool {
    asset.name.ends_with(PACKAGE_SUFFIX)
        && PACKAGE_PREFIXES.iter().any(|p| asset.name.starts_with(p))
}

/// Install the latest VPN client packages from the release feed.
pub async fn install_latest_vpn_package(
    releases: &ReleaseClient,
    runner: &dyn Runner,
    repo: &str,
) -> Result<(), CoreError> {
    let assets = releases.latest_assets(repo).await?;
    let wanted: Vec<&ReleaseAsset> = assets.iter().filter(|a| is_vpn_package(a)).collect();
    if wanted.is_empty() {
        return Err(CoreError::Install {
            message: format!("latest release of {repo} has no installable packages"),
        });
    }

    let staging = tempfile::tempdir()?;
    let mut paths = Vec::with_capacity(wanted.len());
    for asset in wanted {
        debug!(asset = %asset.name, "downloading package");
        let bytes = releases.download(&asset.browser_download_url).await?;
        let path = staging.path().join(&asset.name);
        std::fs::write(&path, bytes)?;
        paths.push(path);
    }

    let mut args = vec!["install", "--force-reinstall"];
    let rendered: Vec<String> = paths
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    args.extend(rendered.iter().map(String::as_str));

    info!(count = rendered.len(), "installing VPN client packages");
    let out = runner.run("opkg", &args)?;
    if !out.success() {
        return Err(CoreError::Install {
            message: out.failure_reason(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testkit::{failure, ScriptedRunner};
    use fleetwire_api::TransportConfig;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_listing(server: &MockServer, assets: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/repos/acme/router-vpn/releases/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "assets": assets })))
            .mount(server)
            .await;
    }

    async fn mount_download(server: &MockServer, url_path: &str, body: &[u8]) {
        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
            .mount(server)
            .await;
    }

    fn client_for(server: &MockServer) -> ReleaseClient {
        let base = Url::parse(&format!("{}/", server.uri())).unwrap();
        ReleaseClient::with_base_url(base, &TransportConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn downloads_and_installs_matching_packages() {
        let server = MockServer::start().await;
        mount_download(&server, "/dl/core.ipk", b"core").await;
        mount_download(&server, "/dl/luci.ipk", b"luci").await;
        mount_listing(
            &server,
            json!([
                {
                    "name": "xray-core_1.8.4-1_aarch64.ipk",
                    "browser_download_url": format!("{}/dl/core.ipk", server.uri())
                },
                {
                    "name": "luci-app-xray_3.3.0-1_all.ipk",
                    "browser_download_url": format!("{}/dl/luci.ipk", server.uri())
                },
                {
                    "name": "checksums.txt",
                    "browser_download_url": format!("{}/dl/checksums.txt", server.uri())
                }
            ]),
        )
        .await;

        let client = client_for(&server);
        let runner = ScriptedRunner::new();

        install_latest_vpn_package(&client, &runner, "acme/router-vpn")
            .await
            .unwrap();

        let install = runner
            .calls()
            .into_iter()
            .find(|c| c.starts_with("opkg install --force-reinstall"))
            .expect("opkg install ran");
        assert!(install.contains("xray-core_1.8.4-1_aarch64.ipk"));
        assert!(install.contains("luci-app-xray_3.3.0-1_all.ipk"));
        assert!(!install.contains("checksums.txt"));
    }

    #[tokio::test]
    async fn release_without_packages_is_an_install_error() {
        let server = MockServer::start().await;
        mount_listing(
            &server,
            json!([
                { "name": "source.tar.gz", "browser_download_url": "http://x/source.tar.gz" }
            ]),
        )
        .await;
        let client = client_for(&server);
        let runner = ScriptedRunner::new();

        let err = install_latest_vpn_package(&client, &runner, "acme/router-vpn")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Install { .. }));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn opkg_failure_is_an_install_error() {
        let server = MockServer::start().await;
        mount_download(&server, "/dl/core.ipk", b"core").await;
        mount_listing(
            &server,
            json!([
                {
                    "name": "xray-core_1.8.4-1_aarch64.ipk",
                    "browser_download_url": format!("{}/dl/core.ipk", server.uri())
                }
            ]),
        )
        .await;

        let client = client_for(&server);
        let runner = ScriptedRunner::new();
        runner.respond_prefix(
            "opkg install --force-reinstall",
            failure(255, "incompatible architecture"),
        );

        let err = install_latest_vpn_package(&client, &runner, "acme/router-vpn")
            .await
            .unwrap_err();
        assert!(
            matches!(err, CoreError::Install { message } if message.contains("architecture"))
        );
    }
}
