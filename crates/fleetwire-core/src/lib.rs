// fleetwire-core: provisioning domain logic between fleetwire-api and the CLI.
//
// Every mutation of device state flows through two injected capabilities:
// `ConfigStore` (the section-based configuration store) and `Runner`
// (external processes). The workflow module composes the provisioning
// steps into the two run-to-completion variants.

pub mod config;
pub mod error;
pub mod fallback;
pub mod harden;
pub mod identity;
pub mod install;
pub mod mesh;
pub mod preflight;
pub mod proxy;
pub mod runner;
pub mod services;
pub mod store;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testkit;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::ProvisionConfig;
pub use error::CoreError;
pub use identity::{DeviceIdentity, derive_identity};
pub use runner::{ExecOutput, Runner, ShellRunner};
pub use store::{ConfigStore, MemoryStore, UciStore, ensure_section};
pub use workflow::{Deps, NullObserver, Observer, Phase, run_proxy_refresh, run_setup};
