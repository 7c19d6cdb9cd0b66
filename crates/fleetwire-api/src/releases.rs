// Release feed client
//
// Lists installable artifacts for a project from the GitHub releases API
// and downloads individual assets. The installer in fleetwire-core owns
// filtering and the install itself; this module is transport only.

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// One downloadable artifact attached to a release.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

#[derive(Debug, Deserialize)]
struct Release {
    assets: Vec<ReleaseAsset>,
}

/// Client for the release-listing endpoint.
pub struct ReleaseClient {
    http: reqwest::Client,
    api_base: Url,
}

impl ReleaseClient {
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Self::with_base_url(Url::parse("https://api.github.com/")?, transport)
    }

    /// Point the client at an alternate API base (tests use a mock server).
    pub fn with_base_url(api_base: Url, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            api_base,
        })
    }

    /// List the assets of the latest release of `repo` (`owner/name`).
    pub async fn latest_assets(&self, repo: &str) -> Result<Vec<ReleaseAsset>, Error> {
        let url = self.api_base.join(&format!("repos/{repo}/releases/latest"))?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Error::Release {
                message: format!("HTTP {status} listing releases for {repo}"),
            });
        }

        let release: Release = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })?;
        Ok(release.assets)
    }

    /// Download a single asset, returning its raw bytes.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, Error> {
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Release {
                message: format!("HTTP {status} downloading {url}"),
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }
}
