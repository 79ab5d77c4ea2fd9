// ── Core error types ──
//
// User-facing errors from fass-core. These are NOT API-specific --
// consumers never see reqwest errors or JSON parse failures directly.
// The `From<fass_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
///
/// `Clone` so the same failure can be both returned to the caller and
/// pushed onto the notice channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    #[error("Not configured: {field} is empty")]
    NotConfigured { field: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to hub at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Hub request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Not connected to the hub")]
    NotConnected,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Entity not found: {entity_id}")]
    NotFound { entity_id: String },

    #[error("Entity '{entity_id}' cannot be toggled: {reason}")]
    Unsupported { entity_id: String, reason: String },

    #[error("Unexpected hub response: {message}")]
    MalformedResponse { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("Hub API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fass_api::Error> for CoreError {
    fn from(err: fass_api::Error) -> Self {
        match err {
            fass_api::Error::InvalidToken => CoreError::AuthenticationFailed {
                message: "the hub rejected the access token".into(),
            },
            fass_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            fass_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout {
                        timeout_secs: fass_api::DEFAULT_TIMEOUT.as_secs(),
                    }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            fass_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid hub URL: {e}"),
            },
            fass_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            fass_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            fass_api::Error::Hub { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            fass_api::Error::NotFound { entity_id } => CoreError::NotFound { entity_id },
            fass_api::Error::InvalidEntityId { entity_id } => CoreError::Unsupported {
                entity_id,
                reason: "malformed entity id".into(),
            },
            fass_api::Error::UnsupportedDomain { entity_id } => CoreError::Unsupported {
                entity_id,
                reason: "only lights and switches are supported".into(),
            },
            fass_api::Error::Deserialization { message, body: _ } => {
                CoreError::MalformedResponse { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_token_maps_to_auth_failure() {
        let err = CoreError::from(fass_api::Error::InvalidToken);
        assert!(err.is_auth_failure());
    }

    #[test]
    fn not_found_keeps_entity_id() {
        let err = CoreError::from(fass_api::Error::NotFound {
            entity_id: "light.gone".into(),
        });
        assert_eq!(
            err,
            CoreError::NotFound {
                entity_id: "light.gone".into()
            }
        );
    }

    #[test]
    fn hub_status_is_preserved() {
        let err = CoreError::from(fass_api::Error::Hub {
            status: 500,
            message: "boom".into(),
        });
        assert_eq!(
            err,
            CoreError::Api {
                message: "boom".into(),
                status: Some(500)
            }
        );
    }
}
