// ── Service restarts ──
//
// Restarts the services whose configuration changed during the run. All
// best-effort: the device is already provisioned at this point and a
// restart that fails here will be picked up on the next boot.

use tracing::warn;

use crate::error::CoreError;
use crate::runner::Runner;

const RESTART_SERVICES: [&str; 2] = ["network", "tailscale"];

/// Restart the network stack services, logging failures without halting.
pub fn restart_network_stack(runner: &dyn Runner) -> Result<(), CoreError> {
    for service in RESTART_SERVICES {
        let script = format!("/etc/init.d/{service}");
        let out = runner.run(&script, &["restart"])?;
        if !out.success() {
            warn!(service, reason = %out.failure_reason(), "service restart failed");
        }
    }
    Ok(())
}
