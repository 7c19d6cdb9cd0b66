// ── Core error types ──
//
// User-facing errors from fleetwire-core. Consumers never see raw HTTP
// failures or JSON parse errors directly -- the `From<fleetwire_api::Error>`
// impl translates transport-layer errors into domain variants. Everything
// here is terminal: the workflow halts on the first error.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Preconditions ────────────────────────────────────────────────
    #[error("WAN link is down: {detail}")]
    WanDown { detail: String },

    #[error("Required package not installed: {name}")]
    MissingPackage { name: String },

    #[error("Cannot read hardware address of interface {interface}: {reason}")]
    Interface { interface: String, reason: String },

    #[error("Missing required configuration: {name}")]
    ConfigMissing { name: String },

    // ── Enrollment ───────────────────────────────────────────────────
    #[error("Enrollment host unreachable: {host}")]
    HostUnreachable { host: String },

    #[error("Device identity not recognized by the fleet: {identity}")]
    IdentityNotFound { identity: String },

    #[error("Enrollment failed: {message}")]
    Enrollment { message: String },

    // ── Device mutation ──────────────────────────────────────────────
    #[error("VPN package install failed: {message}")]
    Install { message: String },

    #[error("Failed to commit '{config}' configuration: {reason}")]
    CommitFailed { config: String, reason: String },

    #[error("Configuration write failed: {reason}")]
    StoreWrite { reason: String },

    #[error("Command '{program}' failed: {reason}")]
    CommandFailed { program: String, reason: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fleetwire_api::Error> for CoreError {
    fn from(err: fleetwire_api::Error) -> Self {
        match err {
            fleetwire_api::Error::IdentityNotFound { identity } => {
                CoreError::IdentityNotFound { identity }
            }
            fleetwire_api::Error::Release { message } => CoreError::Install { message },
            other => CoreError::Enrollment {
                message: other.to_string(),
            },
        }
    }
}
