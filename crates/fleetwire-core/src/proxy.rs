// ── Proxy profile ──
//
// Writes the service-issued proxy connection string into the proxy
// client's configuration, pins its upstream DNS, and clears the split-DNS
// options a previous profile may have left behind. One commit at the end
// so the profile lands whole or not at all.

use tracing::debug;

use crate::error::CoreError;
use crate::store::ConfigStore;

const PROXY_CONFIG: &str = "xray";
const PROFILE_SECTION: &str = "fleet";
const PROXY_DNS: &str = "dns.adguard-dns.com";

/// Write the proxy connection profile for the device.
pub fn apply_proxy_profile(store: &mut dyn ConfigStore, link: &str) -> Result<(), CoreError> {
    debug!("writing proxy profile");
    store.define_section(PROXY_CONFIG, PROFILE_SECTION, "profile")?;
    store.set_option(PROXY_CONFIG, PROFILE_SECTION, "link", link)?;
    store.set_option(PROXY_CONFIG, PROFILE_SECTION, "dns", PROXY_DNS)?;
    store.set_option(PROXY_CONFIG, PROFILE_SECTION, "split_dns", "0")?;
    store.set_option(PROXY_CONFIG, PROFILE_SECTION, "dhcp_hijack", "0")?;
    store.delete_option(PROXY_CONFIG, PROFILE_SECTION, "split_dns_type")?;
    store.delete_option(PROXY_CONFIG, PROFILE_SECTION, "split_dns_server")?;
    store.commit(PROXY_CONFIG)
}
