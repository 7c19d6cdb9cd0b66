//! `fleetwire proxy` -- refresh the proxy connection profile.

use std::path::PathBuf;

use fleetwire_core::harden::AUTHORIZED_KEYS;
use fleetwire_core::{Deps, ShellRunner, UciStore, run_proxy_refresh};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::status::StatusObserver;

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

    run_proxy_refresh(&mut deps, &cfg, &observer)
        .await
        .map_err(Into::into)
}
