// Enrollment service HTTP client
//
// Wraps `reqwest::Client` with fleet-specific URL construction and response
// validation. The service speaks a deliberately small protocol: POST the
// device identity as JSON, get back a bare (quoted) string. Validation of
// that string happens here, at the boundary, so callers only ever see
// typed results.

use std::time::Duration;

use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Timeout for the lightweight reachability probe. Kept shorter than the
/// request timeout so the DNS-fallback decision happens quickly.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// The flag token a valid mesh join string must carry. Its absence means
/// the service answered but did not recognize the device identity.
pub const LOGIN_SERVER_FLAG: &str = "--login-server";

/// Parsed mesh join arguments from a successful `/mesh` enrollment.
///
/// The wire format is a single command-argument string; it is split and
/// validated here so downstream code never substring-matches raw responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshJoin {
    args: Vec<String>,
}

impl MeshJoin {
    /// Split a raw response into arguments, requiring the login-server flag.
    pub fn parse(raw: &str, identity: &str) -> Result<Self, Error> {
        let args: Vec<String> = raw.split_whitespace().map(str::to_owned).collect();
        if !args.iter().any(|a| a.starts_with(LOGIN_SERVER_FLAG)) {
            return Err(Error::IdentityNotFound {
                identity: identity.to_owned(),
            });
        }
        Ok(Self { args })
    }

    /// The join arguments, in service-provided order.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Client for the fleet enrollment service.
///
/// Both enrollment calls are keyed by the device identity (normalized
/// hardware address) and return a quoted string body; one pair of
/// surrounding quotes is stripped before any further handling.
pub struct EnrollClient {
    http: reqwest::Client,
    base_url: Url,
}

impl EnrollClient {
    /// Create a client for the given enrollment host.
    ///
    /// A bare host is addressed over HTTPS; a value that already carries a
    /// scheme is used as-is (tests point this at a local mock server).
    pub fn new(host: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let base = if host.contains("://") {
            host.to_owned()
        } else {
            format!("https://{host}/")
        };
        Ok(Self {
            http: transport.build_client()?,
            base_url: Url::parse(&base)?,
        })
    }

    /// The enrollment service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Basic reachability probe: can we complete any HTTP exchange with the
    /// host at all? The response status is irrelevant -- a 404 still proves
    /// the host resolves and answers.
    pub async fn probe(&self) -> bool {
        debug!("probing {}", self.base_url);
        match self
            .http
            .get(self.base_url.clone())
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(_) => true,
            Err(e) => !(e.is_connect() || e.is_timeout()),
        }
    }

    /// Request a mesh join string for the device and validate it.
    pub async fn enroll_mesh(&self, identity: &str) -> Result<MeshJoin, Error> {
        let raw = self.enroll("mesh", identity).await?;
        MeshJoin::parse(&raw, identity)
    }

    /// Request the proxy connection string for the device.
    ///
    /// The value is opaque to this client beyond quote-stripping, but an
    /// empty string is rejected rather than passed through.
    pub async fn enroll_proxy(&self, identity: &str) -> Result<String, Error> {
        let raw = self.enroll("vless", identity).await?;
        if raw.is_empty() {
            return Err(Error::EmptyResponse { endpoint: "vless" });
        }
        Ok(raw)
    }

    /// Shared POST helper: send the identity, return the quote-stripped body.
    async fn enroll(&self, endpoint: &'static str, identity: &str) -> Result<String, Error> {
        let url = self.base_url.join(endpoint)?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .json(&json!({ "mac_address": identity }))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Error::Enrollment {
                endpoint,
                status: status.as_u16(),
                preview: body.chars().take(200).collect(),
            });
        }

        Ok(strip_quotes(body.trim()).to_owned())
    }
}

/// Strip exactly one pair of surrounding double quotes, if present.
///
/// Unquoted input passes through unchanged; nested quotes are only peeled
/// one level, matching the service's encoding of bare JSON strings.
pub(crate) fn strip_quotes(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(s)
}
