// ── Mesh networking and enrollment ──
//
// Two halves: declaring the mesh interface, firewall zone, and forwardings
// in the config store, and handing the service-issued join arguments to the
// mesh client. Zone and forwardings go through lookup-or-create so a second
// run converges on the same sections instead of appending duplicates.

use fleetwire_api::MeshJoin;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::identity::DeviceIdentity;
use crate::runner::Runner;
use crate::store::{ensure_section, ConfigStore};

/// Logical interface and firewall zone name for the mesh.
pub const MESH_NET: &str = "tailscale";
/// Kernel device the mesh client creates.
const MESH_DEVICE: &str = "tailscale0";

/// Declare the mesh interface, zone, and forwardings, then restart the
/// firewall so the zone takes effect before the mesh client comes up.
pub fn apply_mesh_networking(
    store: &mut dyn ConfigStore,
    runner: &dyn Runner,
) -> Result<(), CoreError> {
    store.define_section("network", MESH_NET, "interface")?;
    store.set_option("network", MESH_NET, "proto", "none")?;
    store.set_option("network", MESH_NET, "device", MESH_DEVICE)?;

    store.define_section("network", "globals", "globals")?;
    store.set_option("network", "globals", "packet_steering", "1")?;

    let zone = ensure_section(store, "firewall", "zone", &[("name", MESH_NET)])?;
    debug!(zone, "mesh firewall zone");
    store.set_option("firewall", &zone, "input", "ACCEPT")?;
    store.set_option("firewall", &zone, "output", "ACCEPT")?;
    store.set_option("firewall", &zone, "forward", "ACCEPT")?;
    store.set_option("firewall", &zone, "masq", "1")?;
    store.set_option("firewall", &zone, "network", MESH_NET)?;

    ensure_section(
        store,
        "firewall",
        "forwarding",
        &[("src", MESH_NET), ("dest", "lan")],
    )?;
    ensure_section(
        store,
        "firewall",
        "forwarding",
        &[("src", "lan"), ("dest", MESH_NET)],
    )?;

    store.commit("network")?;
    store.commit("firewall")?;

    let restart = runner.run("/etc/init.d/firewall", &["restart"])?;
    if !restart.success() {
        return Err(CoreError::CommitFailed {
            config: "firewall".to_owned(),
            reason: format!("restart failed: {}", restart.failure_reason()),
        });
    }
    Ok(())
}

/// Bring the device into the mesh with the service-issued join arguments.
pub fn join_mesh(
    runner: &dyn Runner,
    join: &MeshJoin,
    identity: &DeviceIdentity,
) -> Result<(), CoreError> {
    let hostname = format!("--hostname=router-{identity}");
    let mut args: Vec<&str> = vec!["up"];
    args.extend(join.args().iter().map(String::as_str));
    args.push(&hostname);

    info!(%identity, "joining mesh");
    let out = runner.run("tailscale", &args)?;
    if !out.success() {
        return Err(CoreError::Enrollment {
            message: format!("mesh join failed: {}", out.failure_reason()),
        });
    }
    Ok(())
}
