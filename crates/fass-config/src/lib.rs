//! Connection settings for fass.
//!
//! Three plain-text files (`haurl`, `hatoken`, `haCAcert`) in the
//! platform data directory, plus `FASS_*` environment overrides layered
//! on top with figment when building a `fass_core::ConnectionConfig`.
//!
//! The token is written to disk in cleartext.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use fass_core::ConnectionConfig;

/// Prefix for environment overrides (`FASS_URL`, `FASS_TOKEN`, `FASS_CA_CERT`).
pub const ENV_PREFIX: &str = "FASS_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to write setting '{key}' to {path}: {source}")]
    Write {
        key: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Keys ────────────────────────────────────────────────────────────

/// The persisted settings. Each one is a file named after the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    HubUrl,
    Token,
    CaCert,
}

impl SettingKey {
    pub const ALL: [SettingKey; 3] = [SettingKey::HubUrl, SettingKey::Token, SettingKey::CaCert];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::HubUrl => "haurl",
            Self::Token => "hatoken",
            Self::CaCert => "haCAcert",
        }
    }
}

impl std::fmt::Display for SettingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Store ───────────────────────────────────────────────────────────

/// File-per-key settings store under an application-private root.
#[derive(Debug, Clone)]
pub struct ConnectionConfigStore {
    root: PathBuf,
}

impl ConnectionConfigStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at the platform data directory.
    pub fn open_default() -> Self {
        Self::new(default_root())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, key: SettingKey) -> PathBuf {
        self.root.join(key.as_str())
    }

    /// The stored value, or `None` if it cannot be read for any reason.
    ///
    /// Content is returned as-is; invalid UTF-8 is replaced lossily.
    pub fn load(&self, key: SettingKey) -> Option<String> {
        let path = self.path_of(key);
        match fs::read(&path) {
            Ok(bytes) => Some(
                String::from_utf8(bytes)
                    .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()),
            ),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(key = key.as_str(), path = %path.display(), error = %e, "unreadable setting");
                None
            }
        }
    }

    /// Write `value` verbatim, replacing any previous content.
    pub fn save(&self, key: SettingKey, value: &str) -> Result<(), ConfigError> {
        let path = self.path_of(key);
        let write_err = |source| ConfigError::Write {
            key: key.as_str(),
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.root).map_err(write_err)?;
        fs::write(&path, value).map_err(write_err)?;
        debug!(key = key.as_str(), bytes = value.len(), "setting saved");
        Ok(())
    }

    pub fn exists(&self, key: SettingKey) -> bool {
        self.path_of(key).is_file()
    }

    /// Stored values only; unset keys become empty.
    pub fn load_connection_config(&self) -> ConnectionConfig {
        let ca = self.load(SettingKey::CaCert).filter(|pem| !pem.is_empty());
        let mut config = ConnectionConfig::new(
            self.load(SettingKey::HubUrl).unwrap_or_default(),
            self.load(SettingKey::Token).unwrap_or_default(),
        );
        config.ca_cert_pem = ca;
        config
    }

    /// Commit all three settings. A missing CA is saved as empty.
    ///
    /// Stops at the first failure; earlier keys stay written.
    pub fn save_connection_config(&self, config: &ConnectionConfig) -> Result<(), ConfigError> {
        self.save(SettingKey::HubUrl, &config.base_url)?;
        self.save(SettingKey::Token, config.bearer_token.expose_secret())?;
        self.save(
            SettingKey::CaCert,
            config.ca_cert_pem.as_deref().unwrap_or_default(),
        )?;
        Ok(())
    }

    /// Stored values overlaid with `FASS_URL`, `FASS_TOKEN` and
    /// `FASS_CA_CERT` from the environment. Nothing is written back.
    pub fn resolve_connection_config(&self) -> Result<ConnectionConfig, ConfigError> {
        let stored = self.load_connection_config();
        let layered = Settings {
            url: stored.base_url,
            token: stored.bearer_token.expose_secret().to_owned(),
            ca_cert: stored.ca_cert_pem,
        };

        // Taken verbatim: a token like `1234` must stay a string.
        let overrides: BTreeMap<String, String> = Env::prefixed(ENV_PREFIX)
            .only(&["url", "token", "ca_cert"])
            .iter()
            .map(|(key, value)| (key.as_str().to_owned(), value))
            .collect();
        if !overrides.is_empty() {
            debug!(keys = ?overrides.keys().collect::<Vec<_>>(), "applying environment overrides");
        }

        let settings: Settings = Figment::new()
            .merge(Serialized::defaults(layered))
            .merge(Serialized::defaults(overrides))
            .extract()?;

        let mut config = ConnectionConfig::new(settings.url, settings.token);
        config.ca_cert_pem = settings.ca_cert.filter(|pem| !pem.is_empty());
        Ok(config)
    }
}

/// Flat view used for the figment layering.
#[derive(Debug, Default, Deserialize, Serialize)]
struct Settings {
    #[serde(default)]
    url: String,
    #[serde(default)]
    token: String,
    #[serde(default)]
    ca_cert: Option<String>,
}

// ── Paths ───────────────────────────────────────────────────────────

/// Platform data directory for fass settings.
pub fn default_root() -> PathBuf {
    ProjectDirs::from("io", "fass", "fass").map_or_else(dirs_fallback, |dirs| {
        dirs.data_dir().to_path_buf()
    })
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".local");
    p.push("share");
    p.push("fass");
    p
}
