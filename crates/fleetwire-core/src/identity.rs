// ── Device identity ──
//
// The identity is the normalized hardware address of the device's primary
// interface: lowercase hex, no separators, exactly 12 characters. It keys
// both enrollment calls, so it is validated at construction rather than
// letting a malformed value surface as a confusing remote lookup miss.

use std::fmt;
use std::path::Path;

use crate::error::CoreError;

/// Normalized hardware address used as the enrollment lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceIdentity(String);

impl DeviceIdentity {
    /// Normalize a raw hardware address (any common separator style).
    pub fn new(raw: &str, interface: &str) -> Result<Self, CoreError> {
        let normalized: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| *c != ':' && *c != '-')
            .collect();

        if normalized.len() != 12 || !normalized.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::Interface {
                interface: interface.to_owned(),
                reason: format!("malformed hardware address {raw:?}"),
            });
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derive the device identity from a named interface via sysfs.
pub fn derive_identity(interface: &str) -> Result<DeviceIdentity, CoreError> {
    derive_identity_in(Path::new("/sys/class/net"), interface)
}

/// Sysfs-root-parameterized variant, also used by the workflow and tests.
pub fn derive_identity_in(sysfs_net: &Path, interface: &str) -> Result<DeviceIdentity, CoreError> {
    let path = sysfs_net.join(interface).join("address");
    let raw = std::fs::read_to_string(&path).map_err(|e| CoreError::Interface {
        interface: interface.to_owned(),
        reason: format!("{}: {e}", path.display()),
    })?;
    DeviceIdentity::new(&raw, interface)
}
