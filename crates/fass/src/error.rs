//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use fass_config::ConfigError;
use fass_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONFIG: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Not configured: {field} is empty")]
    #[diagnostic(
        code(fass::not_configured),
        help(
            "Save connection settings with:\n  \
             fass config set --url https://hub.local:8123 --token-stdin\n\
             or set FASS_URL and FASS_TOKEN."
        )
    )]
    NotConfigured { field: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(fass::config))]
    Config { message: String },

    #[error(transparent)]
    #[diagnostic(code(fass::settings_io))]
    Settings(#[from] ConfigError),

    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to hub at {url}")]
    #[diagnostic(
        code(fass::connection_failed),
        help("Check that the hub is running and the URL is right: fass config show")
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(fass::auth_failed),
        help(
            "Create a long-lived access token in the hub's user profile and save it:\n  \
             fass config set --token-stdin"
        )
    )]
    AuthFailed { message: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(code(fass::timeout), help("Check the hub's responsiveness."))]
    Timeout { seconds: u64 },

    // ── Entities ─────────────────────────────────────────────────────
    #[error("Entity '{entity_id}' not found")]
    #[diagnostic(
        code(fass::not_found),
        help("Run: fass list to see available entities")
    )]
    NotFound { entity_id: String },

    #[error("Entity '{entity_id}' cannot be toggled: {reason}")]
    #[diagnostic(code(fass::unsupported))]
    Unsupported { entity_id: String, reason: String },

    // ── Hub ──────────────────────────────────────────────────────────
    #[error("Hub API error: {message}")]
    #[diagnostic(code(fass::api_error))]
    ApiError {
        message: String,
        /// HTTP status, when the hub sent one.
        status: Option<u16>,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(fass::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(fass::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. }
            | Self::ApiError {
                status: Some(404), ..
            } => exit_code::NOT_FOUND,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotConfigured { .. } | Self::Config { .. } | Self::Settings(_) => {
                exit_code::CONFIG
            }
            Self::Validation { .. } => exit_code::USAGE,
            Self::ApiError { .. } | Self::Io(_) | Self::Json(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotConfigured { field } => CliError::NotConfigured { field },
            CoreError::Config { message } => CliError::Config { message },
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::NotConnected => CliError::ConnectionFailed {
                url: "(not connected)".into(),
                source: "the hub did not answer the startup probe".into(),
            },
            CoreError::NotFound { entity_id } => CliError::NotFound { entity_id },
            CoreError::Unsupported { entity_id, reason } => {
                CliError::Unsupported { entity_id, reason }
            }
            CoreError::MalformedResponse { message } => CliError::ApiError {
                message,
                status: None,
            },
            CoreError::Api { message, status } => CliError::ApiError { message, status },
        }
    }
}
