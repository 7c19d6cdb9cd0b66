//! Command handlers and shared wiring.

pub mod proxy;
pub mod setup;

use std::time::Duration;

use fleetwire_api::{EnrollClient, ReleaseClient, TlsMode, TransportConfig};
use fleetwire_core::CoreError;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build the HTTP clients from the global flags.
pub(crate) fn build_clients(
    global: &GlobalOpts,
    api_host: &str,
) -> Result<(EnrollClient, ReleaseClient), CliError> {
    let transport = TransportConfig {
        tls: if global.insecure {
            TlsMode::DangerAcceptInvalid
        } else {
            TlsMode::System
        },
        timeout: Duration::from_secs(global.timeout),
    };
    let enroll = EnrollClient::new(api_host, &transport).map_err(CoreError::from)?;
    let releases = ReleaseClient::new(&transport).map_err(CoreError::from)?;
    Ok((enroll, releases))
}
