//! Environment-based configuration.
//!
//! All secrets and the service host come in through `FLEETWIRE_*`
//! environment variables; flags only override non-secret values. Validation
//! happens here, in a fixed order, so the first missing value is the one
//! reported.

use figment::providers::Env;
use figment::Figment;
use secrecy::SecretString;
use serde::Deserialize;

use fleetwire_core::ProvisionConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    api_host: Option<String>,
    ssh_key: Option<String>,
    password: Option<SecretString>,
}

fn missing(name: &str) -> CliError {
    CliError::MissingConfig {
        name: name.to_owned(),
    }
}

/// Resolve the provisioning configuration from the environment and flags.
pub fn resolve(global: &GlobalOpts) -> Result<ProvisionConfig, CliError> {
    let raw: RawSettings = Figment::new()
        .merge(Env::prefixed("FLEETWIRE_"))
        .extract()?;

    let api_host = global
        .api_host
        .clone()
        .or(raw.api_host)
        .ok_or_else(|| missing("FLEETWIRE_API_HOST"))?;
    let ssh_key = raw.ssh_key.ok_or_else(|| missing("FLEETWIRE_SSH_KEY"))?;
    let password = raw.password.ok_or_else(|| missing("FLEETWIRE_PASSWORD"))?;

    Ok(ProvisionConfig {
        api_host,
        ssh_key,
        password,
        interface: global.interface.clone(),
        vpn_repo: global.vpn_repo.clone(),
    })
}
