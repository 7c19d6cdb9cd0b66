// ── Provisioning workflow ──
//
// The fixed phase sequence. Strictly linear and fail-fast: the first
// error halts the run, and the one recovery path (DNS fallback) lives
// inside the reachability phase. Dependencies come in through `Deps` so
// the whole sequence runs against doubles in tests.

use std::fmt;
use std::path::PathBuf;

use fleetwire_api::{EnrollClient, ReleaseClient};
use tracing::{info, warn};

use crate::config::ProvisionConfig;
use crate::error::CoreError;
use crate::fallback::ensure_host_reachable;
use crate::harden::harden_access;
use crate::identity::{derive_identity_in, DeviceIdentity};
use crate::install::install_latest_vpn_package;
use crate::mesh::{apply_mesh_networking, join_mesh};
use crate::preflight::run_preflight;
use crate::proxy::apply_proxy_profile;
use crate::runner::Runner;
use crate::services::restart_network_stack;
use crate::store::ConfigStore;

/// Everything the workflow touches outside its own logic.
pub struct Deps<'a> {
    pub store: &'a mut dyn ConfigStore,
    pub runner: &'a dyn Runner,
    pub enroll: &'a EnrollClient,
    pub releases: &'a ReleaseClient,
    /// Authorized-keys file the hardening phase replaces.
    pub authorized_keys: PathBuf,
    /// Root of the kernel's per-interface network attributes.
    pub sysfs_net: PathBuf,
}

/// One phase of the provisioning sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Preflight,
    Identity,
    Reachability,
    MeshEnrollment,
    MeshNetworking,
    VpnInstall,
    ProxyEnrollment,
    ProxyProfile,
    Restart,
    Harden,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Preflight => "preflight checks",
            Phase::Identity => "device identity",
            Phase::Reachability => "service reachability",
            Phase::MeshEnrollment => "mesh enrollment",
            Phase::MeshNetworking => "mesh networking",
            Phase::VpnInstall => "VPN package install",
            Phase::ProxyEnrollment => "proxy enrollment",
            Phase::ProxyProfile => "proxy profile",
            Phase::Restart => "service restarts",
            Phase::Harden => "access hardening",
        };
        f.write_str(label)
    }
}

/// Progress callbacks for a workflow run.
pub trait Observer: Send + Sync {
    fn phase(&self, _phase: Phase) {}
    fn completed(&self, _phase: Phase) {}
}

/// Observer that reports nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl Observer for NullObserver {}

/// Run the full provisioning sequence.
pub async fn run_setup(
    deps: &mut Deps<'_>,
    cfg: &ProvisionConfig,
    observer: &dyn Observer,
) -> Result<(), CoreError> {
    observer.phase(Phase::Preflight);
    run_preflight(deps.runner)?;
    observer.completed(Phase::Preflight);

    let identity = derive(deps, cfg, observer)?;
    reach(deps, observer).await?;

    observer.phase(Phase::MeshEnrollment);
    let join = deps.enroll.enroll_mesh(identity.as_str()).await?;
    observer.completed(Phase::MeshEnrollment);

    observer.phase(Phase::MeshNetworking);
    apply_mesh_networking(deps.store, deps.runner)?;
    join_mesh(deps.runner, &join, &identity)?;
    observer.completed(Phase::MeshNetworking);

    observer.phase(Phase::VpnInstall);
    install_latest_vpn_package(deps.releases, deps.runner, &cfg.vpn_repo).await?;
    observer.completed(Phase::VpnInstall);

    let link = enroll_proxy(deps, &identity, observer).await?;
    write_profile(deps, &link, observer)?;

    observer.phase(Phase::Restart);
    restart_network_stack(deps.runner)?;
    observer.completed(Phase::Restart);

    observer.phase(Phase::Harden);
    harden_access(
        deps.store,
        deps.runner,
        &deps.authorized_keys,
        &cfg.ssh_key,
        &cfg.password,
    )?;
    observer.completed(Phase::Harden);

    info!("device provisioned");
    Ok(())
}

/// Re-fetch the proxy connection string and rewrite the profile, leaving
/// the rest of the device untouched.
pub async fn run_proxy_refresh(
    deps: &mut Deps<'_>,
    cfg: &ProvisionConfig,
    observer: &dyn Observer,
) -> Result<(), CoreError> {
    let identity = derive(deps, cfg, observer)?;
    reach(deps, observer).await?;

    let link = enroll_proxy(deps, &identity, observer).await?;
    write_profile(deps, &link, observer)?;

    let out = deps.runner.run("/etc/init.d/xray", &["restart"])?;
    if !out.success() {
        warn!(reason = %out.failure_reason(), "proxy client restart failed");
    }

    info!("proxy profile refreshed");
    Ok(())
}

fn derive(
    deps: &Deps<'_>,
    cfg: &ProvisionConfig,
    observer: &dyn Observer,
) -> Result<DeviceIdentity, CoreError> {
    observer.phase(Phase::Identity);
    let identity = derive_identity_in(&deps.sysfs_net, &cfg.interface)?;
    info!(%identity, "device identity derived");
    observer.completed(Phase::Identity);
    Ok(identity)
}

async fn reach(deps: &mut Deps<'_>, observer: &dyn Observer) -> Result<(), CoreError> {
    observer.phase(Phase::Reachability);
    ensure_host_reachable(deps.enroll, deps.store, deps.runner).await?;
    observer.completed(Phase::Reachability);
    Ok(())
}

async fn enroll_proxy(
    deps: &Deps<'_>,
    identity: &DeviceIdentity,
    observer: &dyn Observer,
) -> Result<String, CoreError> {
    observer.phase(Phase::ProxyEnrollment);
    let link = deps.enroll.enroll_proxy(identity.as_str()).await?;
    observer.completed(Phase::ProxyEnrollment);
    Ok(link)
}

fn write_profile(
    deps: &mut Deps<'_>,
    link: &str,
    observer: &dyn Observer,
) -> Result<(), CoreError> {
    observer.phase(Phase::ProxyProfile);
    apply_proxy_profile(deps.store, link)?;
    observer.completed(Phase::ProxyProfile);
    Ok(())
}
