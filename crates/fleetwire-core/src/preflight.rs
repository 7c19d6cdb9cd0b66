// ── Preflight checks ──
//
// Verified before anything is written: the WAN link must be up and the
// packages the rest of the run depends on must already be installed.
// Checks run in a fixed order and the first failure wins.

use serde::Deserialize;
use tracing::debug;

use crate::error::CoreError;
use crate::runner::Runner;

/// Packages the provisioning run assumes, checked in this order.
pub const REQUIRED_PACKAGES: [&str; 4] = ["tailscale", "curl", "ca-bundle", "kmod-tun"];

#[derive(Debug, Deserialize)]
struct WanStatus {
    #[serde(default)]
    up: bool,
}

/// Confirm the WAN interface reports itself up.
pub fn check_wan(runner: &dyn Runner) -> Result<(), CoreError> {
    let out = runner.run("ubus", &["call", "network.interface.wan", "status"])?;
    if !out.success() {
        return Err(CoreError::WanDown {
            detail: out.failure_reason(),
        });
    }
    let status: WanStatus =
        serde_json::from_str(&out.stdout).map_err(|e| CoreError::WanDown {
            detail: format!("unreadable interface status: {e}"),
        })?;
    if !status.up {
        return Err(CoreError::WanDown {
            detail: "interface reports up=false".to_owned(),
        });
    }
    debug!("WAN link is up");
    Ok(())
}

/// Confirm every required package is installed; first missing one wins.
pub fn check_packages(runner: &dyn Runner) -> Result<(), CoreError> {
    for name in REQUIRED_PACKAGES {
        let out = runner.run("opkg", &["list-installed", name])?;
        let installed = out.success()
            && out
                .stdout
                .lines()
                .any(|line| line.split_whitespace().next() == Some(name));
        if !installed {
            return Err(CoreError::MissingPackage {
                name: name.to_owned(),
            });
        }
        debug!(package = name, "required package present");
    }
    Ok(())
}

/// Run all preflight checks.
pub fn run_preflight(runner: &dyn Runner) -> Result<(), CoreError> {
    check_wan(runner)?;
    check_packages(runner)
}
