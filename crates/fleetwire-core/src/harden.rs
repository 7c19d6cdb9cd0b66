// ── SSH and account hardening ──
//
// The last phase, run only once everything else has succeeded: key-only
// SSH would lock the operator out of a half-provisioned device. Replaces
// the authorized keys wholesale, turns password login off, and rotates
// the root password.

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use crate::error::CoreError;
use crate::runner::Runner;
use crate::store::{ensure_section, ConfigStore};

/// Default authorized-keys path for the device's SSH daemon.
pub const AUTHORIZED_KEYS: &str = "/etc/dropbear/authorized_keys";

/// Enforce key-only SSH and rotate the root password.
pub fn harden_access(
    store: &mut dyn ConfigStore,
    runner: &dyn Runner,
    authorized_keys: &Path,
    ssh_key: &str,
    password: &SecretString,
) -> Result<(), CoreError> {
    if let Some(parent) = authorized_keys.parent() {
        std::fs::create_dir_all(parent)?;
    }
    // Overwrite: the fleet key is the only key.
    std::fs::write(authorized_keys, format!("{}\n", ssh_key.trim_end()))?;
    info!(path = %authorized_keys.display(), "authorized keys replaced");

    let section = ensure_section(store, "dropbear", "dropbear", &[])?;
    store.set_option("dropbear", &section, "PasswordAuth", "off")?;
    store.set_option("dropbear", &section, "RootPasswordAuth", "off")?;
    store.commit("dropbear")?;

    let restart = runner.run("/etc/init.d/dropbear", &["restart"])?;
    if !restart.success() {
        return Err(CoreError::CommandFailed {
            program: "/etc/init.d/dropbear".to_owned(),
            reason: restart.failure_reason(),
        });
    }

    let secret = password.expose_secret();
    let out = runner.run_with_stdin("passwd", &["root"], &format!("{secret}\n{secret}\n"))?;
    if !out.success() {
        return Err(CoreError::CommandFailed {
            program: "passwd".to_owned(),
            reason: out.failure_reason(),
        });
    }
    info!("root password rotated");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::testkit::{failure, ScriptedRunner};

    const KEY: &str = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAA fleet@ops";

    fn password() -> SecretString {
        SecretString::from("s3cret".to_owned())
    }

    #[test]
    fn replaces_keys_and_locks_down_daemon() {
        let dir = tempfile::tempdir().unwrap();
        let keys = dir.path().join("dropbear").join("authorized_keys");
        let mut store = MemoryStore::default();
        let runner = ScriptedRunner::new();

        harden_access(&mut store, &runner, &keys, KEY, &password()).unwrap();

        let written = std::fs::read_to_string(&keys).unwrap();
        assert_eq!(written, format!("{KEY}\n"));

        let sections = store.sections_of("dropbear", "dropbear");
        assert_eq!(sections.len(), 1);
        let id = sections[0].id.clone();
        assert_eq!(store.get("dropbear", &id, "PasswordAuth"), Some("off"));
        assert_eq!(store.get("dropbear", &id, "RootPasswordAuth"), Some("off"));
        assert_eq!(store.commit_count("dropbear"), 1);

        assert!(runner.ran("/etc/init.d/dropbear restart"));
        assert_eq!(runner.stdin_of("passwd root").as_deref(), Some("s3cret\ns3cret\n"));
    }

    #[test]
    fn overwrites_existing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let keys = dir.path().join("authorized_keys");
        std::fs::write(&keys, "ssh-rsa OLDKEY old@host\n").unwrap();
        let mut store = MemoryStore::default();
        let runner = ScriptedRunner::new();

        harden_access(&mut store, &runner, &keys, KEY, &password()).unwrap();

        let written = std::fs::read_to_string(&keys).unwrap();
        assert!(!written.contains("OLDKEY"));
        assert_eq!(written, format!("{KEY}\n"));
    }

    #[test]
    fn reuses_existing_daemon_section() {
        let dir = tempfile::tempdir().unwrap();
        let keys = dir.path().join("authorized_keys");
        let mut store = MemoryStore::default();
        store.define_section("dropbear", "main", "dropbear").unwrap();
        let runner = ScriptedRunner::new();

        harden_access(&mut store, &runner, &keys, KEY, &password()).unwrap();

        assert_eq!(store.sections_of("dropbear", "dropbear").len(), 1);
        assert_eq!(store.get("dropbear", "main", "PasswordAuth"), Some("off"));
    }

    #[test]
    fn daemon_restart_failure_is_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let keys = dir.path().join("authorized_keys");
        let mut store = MemoryStore::default();
        let runner = ScriptedRunner::new();
        runner.respond("/etc/init.d/dropbear restart", failure(1, "no pid"));

        let err = harden_access(&mut store, &runner, &keys, KEY, &password()).unwrap_err();
        assert!(matches!(err, CoreError::CommandFailed { .. }));
        // The password is not touched if the daemon never came back.
        assert_eq!(runner.stdin_of("passwd root"), None);
    }

    #[test]
    fn password_change_failure_is_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let keys = dir.path().join("authorized_keys");
        let mut store = MemoryStore::default();
        let runner = ScriptedRunner::new();
        runner.respond("passwd root", failure(1, "password too short"));

        let err = harden_access(&mut store, &runner, &keys, KEY, &password()).unwrap_err();
        assert!(matches!(err, CoreError::CommandFailed { program, .. } if program == "passwd"));
    }
}
