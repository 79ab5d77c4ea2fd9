use thiserror::Error;

/// Top-level error type for the `fass-api` crate.
///
/// Covers every failure mode of the hub REST surface: authentication,
/// transport, hub-reported errors, and response decoding.
/// `fass-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The hub rejected the bearer token (HTTP 401/403).
    #[error("Invalid access token")]
    InvalidToken,

    /// The token could not be turned into an `Authorization` header.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Hub ─────────────────────────────────────────────────────────
    /// Non-success response from the hub.
    #[error("Hub API error (HTTP {status}): {message}")]
    Hub { status: u16, message: String },

    /// The entity does not exist (any more) on the hub.
    #[error("Entity not found: {entity_id}")]
    NotFound { entity_id: String },

    /// The id is not of the form `<domain>.<object_id>`.
    #[error("Invalid entity id: {entity_id:?}")]
    InvalidEntityId { entity_id: String },

    /// The entity exists but is neither a light nor a switch.
    #[error("Entity '{entity_id}' is not a controllable light or switch")]
    UnsupportedDomain { entity_id: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the hub refused our credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::InvalidToken | Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth a manual retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::Hub { status: 404, .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }
}
