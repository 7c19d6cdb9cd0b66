//! `fleetwire setup` -- the full provisioning sequence.

use std::path::PathBuf;
use std::time::Duration;

use fleetwire_core::harden::AUTHORIZED_KEYS;
use fleetwire_core::{CoreError, Deps, ShellRunner, UciStore, run_setup};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::status::StatusObserver;

/// Pause before aborting on an unregistered device, so the message is
/// readable when the tool runs from a wrapper script.
const IDENTITY_HINT_PAUSE: Duration = Duration::from_secs(3);

pub async fn run(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::resolve(global)?;
    let (enroll, releases) = super::build_clients(global, &cfg.api_host)?;

    let runner = ShellRunner;
    let mut store = UciStore::new(&runner);
    let mut deps = Deps {
        store: &mut store,
        runner: &runner,
        enroll: &enroll,
        releases: &releases,
        authorized_keys: PathBuf::from(AUTHORIZED_KEYS),
        sysfs_net: PathBuf::from("/sys/class/net"),
    };
    let observer = StatusObserver::new(global.quiet);

    match run_setup(&mut deps, &cfg, &observer).await {
        Err(CoreError::IdentityNotFound { identity }) => {
            eprintln!("Device {identity} is not registered with the fleet.");
            tokio::time::sleep(IDENTITY_HINT_PAUSE).await;
            Err(CoreError::IdentityNotFound { identity }.into())
        }
        result => result.map_err(Into::into),
    }
}
