// ── Provisioning configuration ──
//
// Core receives a fully resolved `ProvisionConfig`; the CLI owns loading
// and validation (environment variables, flags). Values are immutable for
// the duration of a run.

use secrecy::SecretString;

/// Resolved inputs for one provisioning run.
#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    /// Enrollment service host (bare hostname, addressed over HTTPS).
    pub api_host: String,

    /// SSH public key that replaces all existing authorized keys.
    pub ssh_key: String,

    /// New local account password, set at the end of the run.
    pub password: SecretString,

    /// Interface whose hardware address becomes the device identity.
    pub interface: String,

    /// Release repository (`owner/name`) for the VPN client packages.
    pub vpn_repo: String,
}
