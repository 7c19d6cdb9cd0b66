// ── Reachability with DNS fallback ──
//
// The one recovery path in an otherwise fail-fast run. If the enrollment
// host does not answer, assume a broken upstream resolver: pin a public
// resolver on the WAN interface, reload the network, and probe exactly
// once more. A second miss is terminal.

use fleetwire_api::EnrollClient;
use tracing::{info, warn};

use crate::error::CoreError;
use crate::runner::Runner;
use crate::store::ConfigStore;

const FALLBACK_DNS: &str = "8.8.8.8";

/// Confirm the enrollment host answers, applying the DNS fallback once.
pub async fn ensure_host_reachable(
    client: &EnrollClient,
    store: &mut dyn ConfigStore,
    runner: &dyn Runner,
) -> Result<(), CoreError> {
    if client.probe().await {
        return Ok(());
    }

    info!(dns = FALLBACK_DNS, "enrollment host unreachable, pinning fallback resolver");
    store.set_option("network", "wan", "peerdns", "0")?;
    store.set_option("network", "wan", "dns", FALLBACK_DNS)?;
    store.commit("network")?;

    let reload = runner.run("/etc/init.d/network", &["reload"])?;
    if !reload.success() {
        warn!(reason = %reload.failure_reason(), "network reload failed");
    }

    if client.probe().await {
        return Ok(());
    }
    Err(CoreError::HostUnreachable {
        host: client.base_url().to_string(),
    })
}
