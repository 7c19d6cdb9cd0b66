//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help
//! text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use fleetwire_core::CoreError;

/// Process exit codes, one per failure class. Usage errors exit 2 via
/// clap; success is implicit.
pub mod exit_code {
    #![allow(dead_code)]

    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const PRECONDITION: i32 = 3;
    pub const ENROLLMENT: i32 = 4;
    pub const CONFIG: i32 = 5;
    pub const INSTALL: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Preconditions ────────────────────────────────────────────────
    #[error("WAN link is down: {detail}")]
    #[diagnostic(
        code(fleetwire::wan_down),
        help(
            "Check the upstream connection, then inspect:\n\
             ubus call network.interface.wan status"
        )
    )]
    WanDown { detail: String },

    #[error("Required package not installed: {name}")]
    #[diagnostic(
        code(fleetwire::missing_package),
        help("Install it with: opkg update && opkg install {name}")
    )]
    MissingPackage { name: String },

    #[error("Cannot derive the device identity from interface {interface}")]
    #[diagnostic(
        code(fleetwire::interface),
        help("Pick another interface with --interface (-i). Reason: {reason}")
    )]
    Interface { interface: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Missing required configuration: {name}")]
    #[diagnostic(
        code(fleetwire::missing_config),
        help("Set the {name} environment variable before running.")
    )]
    MissingConfig { name: String },

    #[error(transparent)]
    #[diagnostic(code(fleetwire::config))]
    Config(Box<figment::Error>),

    // ── Enrollment ───────────────────────────────────────────────────
    #[error("Enrollment host unreachable: {host}")]
    #[diagnostic(
        code(fleetwire::host_unreachable),
        help(
            "The host did not answer, even after pinning a public DNS resolver.\n\
             Check --api-host / FLEETWIRE_API_HOST and the upstream connection."
        )
    )]
    HostUnreachable { host: String },

    #[error("Device not registered with the fleet: {identity}")]
    #[diagnostic(
        code(fleetwire::identity_not_found),
        help("Register this hardware address with the fleet operator, then rerun.")
    )]
    IdentityNotFound { identity: String },

    #[error("Enrollment failed: {message}")]
    #[diagnostic(code(fleetwire::enrollment))]
    Enrollment { message: String },

    // ── Device mutation ──────────────────────────────────────────────
    #[error("VPN package install failed: {message}")]
    #[diagnostic(
        code(fleetwire::install),
        help("Check the release repository with --vpn-repo and the device architecture.")
    )]
    Install { message: String },

    #[error("Device update failed: {message}")]
    #[diagnostic(code(fleetwire::device))]
    Device { message: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::WanDown { .. } | Self::MissingPackage { .. } | Self::Interface { .. } => {
                exit_code::PRECONDITION
            }
            Self::MissingConfig { .. } | Self::Config(_) => exit_code::CONFIG,
            Self::HostUnreachable { .. } => exit_code::CONNECTION,
            Self::IdentityNotFound { .. } | Self::Enrollment { .. } => exit_code::ENROLLMENT,
            Self::Install { .. } => exit_code::INSTALL,
            Self::Device { .. } | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::WanDown { detail } => CliError::WanDown { detail },
            CoreError::MissingPackage { name } => CliError::MissingPackage { name },
            CoreError::Interface { interface, reason } => {
                CliError::Interface { interface, reason }
            }
            CoreError::ConfigMissing { name } => CliError::MissingConfig { name },
            CoreError::HostUnreachable { host } => CliError::HostUnreachable { host },
            CoreError::IdentityNotFound { identity } => CliError::IdentityNotFound { identity },
            CoreError::Enrollment { message } => CliError::Enrollment { message },
            CoreError::Install { message } => CliError::Install { message },
            CoreError::Io(err) => CliError::Io(err),
            other => CliError::Device {
                message: other.to_string(),
            },
        }
    }
}
