use thiserror::Error;

/// Top-level error type for the `fleetwire-api` crate.
///
/// Covers every failure mode across both API surfaces: the fleet enrollment
/// service and the release feed. `fleetwire-core` maps these into its own
/// domain taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Enrollment service ──────────────────────────────────────────
    /// The service answered, but did not recognize the device identity.
    #[error("Device identity not recognized by the enrollment service: {identity}")]
    IdentityNotFound { identity: String },

    /// Non-success HTTP status from an enrollment endpoint.
    #[error("Enrollment call to /{endpoint} failed (HTTP {status}): {preview}")]
    Enrollment {
        endpoint: &'static str,
        status: u16,
        preview: String,
    },

    /// Empty body after quote-stripping. An empty connection string would
    /// otherwise flow silently into the device configuration.
    #[error("Enrollment service returned an empty /{endpoint} response")]
    EmptyResponse { endpoint: &'static str },

    // ── Release feed ────────────────────────────────────────────────
    /// Release listing or asset download failed.
    #[error("Release feed error: {message}")]
    Release { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}
