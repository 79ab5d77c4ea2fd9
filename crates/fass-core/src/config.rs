// ── Runtime connection configuration ──
//
// Describes *how* to reach the hub. Carries credential data but never
// touches disk: fass-config loads it, the shell hands it in.

use secrecy::{ExposeSecret, SecretString};

use crate::error::CoreError;

/// Connection settings for the single hub.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Hub base URL (e.g. `https://hub.local:8123`). Stored verbatim;
    /// parsed when the client is built.
    pub base_url: String,
    /// Long-lived access token sent as `Authorization: Bearer`.
    pub bearer_token: SecretString,
    /// Extra CA certificate(s) in PEM form.
    pub ca_cert_pem: Option<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            bearer_token: SecretString::from(String::new()),
            ca_cert_pem: None,
        }
    }
}

impl ConnectionConfig {
    pub fn new(base_url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: SecretString::from(bearer_token.into()),
            ca_cert_pem: None,
        }
    }

    pub fn with_ca_cert(mut self, pem: impl Into<String>) -> Self {
        self.ca_cert_pem = Some(pem.into());
        self
    }

    /// URL and token must both be non-empty before any hub call.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.base_url.trim().is_empty() {
            return Err(CoreError::NotConfigured {
                field: "hub URL".into(),
            });
        }
        if self.bearer_token.expose_secret().trim().is_empty() {
            return Err(CoreError::NotConfigured {
                field: "access token".into(),
            });
        }
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.validate().is_ok()
    }

    /// The CA PEM if one is set and non-blank.
    pub fn ca_cert(&self) -> Option<&str> {
        self.ca_cert_pem
            .as_deref()
            .filter(|pem| !pem.trim().is_empty())
    }
}
