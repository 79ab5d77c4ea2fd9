//! Config subcommand handlers.

use std::io::{self, BufRead, IsTerminal};

use fass_config::{ConnectionConfigStore, SettingKey};
use secrecy::SecretString;
use serde::Serialize;

use crate::cli::{ConfigArgs, ConfigCommand, ConfigSetArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::open_store;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = open_store(global);
    match args.command {
        ConfigCommand::Show => show(&store, global),
        ConfigCommand::Set(set_args) => set(&store, set_args),
        ConfigCommand::Path => {
            output::print_output(&store.root().display().to_string());
            Ok(())
        }
    }
}

// ── show ────────────────────────────────────────────────────────────

/// Stored settings with the token masked.
#[derive(Debug, Serialize)]
struct StoredView {
    root: String,
    url: Option<String>,
    token: Option<&'static str>,
    ca_cert: Option<String>,
}

fn redacted_view(store: &ConnectionConfigStore) -> StoredView {
    let non_empty = |key| store.load(key).filter(|v: &String| !v.is_empty());
    StoredView {
        root: store.root().display().to_string(),
        url: non_empty(SettingKey::HubUrl),
        token: non_empty(SettingKey::Token).map(|_| "****"),
        ca_cert: non_empty(SettingKey::CaCert)
            .map(|pem| format!("{} certificate block(s)", pem.matches("BEGIN CERTIFICATE").count())),
    }
}

fn show(store: &ConnectionConfigStore, global: &GlobalOpts) -> Result<(), CliError> {
    let view = redacted_view(store);
    let out = output::render_single(global.output, &view, |v| {
        [
            format!("Root:    {}", v.root),
            format!("URL:     {}", v.url.as_deref().unwrap_or("-")),
            format!("Token:   {}", v.token.unwrap_or("-")),
            format!("CA cert: {}", v.ca_cert.as_deref().unwrap_or("-")),
        ]
        .join("\n")
    })?;
    output::print_output(&out);
    Ok(())
}

// ── set ─────────────────────────────────────────────────────────────

fn set(store: &ConnectionConfigStore, args: ConfigSetArgs) -> Result<(), CliError> {
    if args.url.is_none()
        && args.token.is_none()
        && !args.token_stdin
        && args.ca_cert.is_none()
        && !args.clear_ca_cert
    {
        return Err(CliError::Validation {
            field: "config set".into(),
            reason: "nothing to change; pass --url, --token, --token-stdin, --ca-cert or --clear-ca-cert"
                .into(),
        });
    }

    let mut config = store.load_connection_config();

    if let Some(url) = args.url {
        config.base_url = url.trim().to_owned();
    }

    if let Some(token) = args.token {
        config.bearer_token = SecretString::from(token);
    } else if args.token_stdin {
        config.bearer_token = read_token()?;
    }

    if let Some(path) = args.ca_cert {
        let pem = std::fs::read_to_string(&path).map_err(|e| CliError::Validation {
            field: "ca-cert".into(),
            reason: format!("cannot read {}: {e}", path.display()),
        })?;
        config.ca_cert_pem = Some(pem);
    } else if args.clear_ca_cert {
        config.ca_cert_pem = None;
    }

    store.save_connection_config(&config)?;
    eprintln!("Saved settings to {}", store.root().display());
    Ok(())
}

/// Prompt on a terminal, otherwise read one line from stdin.
fn read_token() -> Result<SecretString, CliError> {
    let raw = if io::stdin().is_terminal() {
        rpassword::prompt_password("Access token: ")?
    } else {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        line
    };

    let token = raw.trim();
    if token.is_empty() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "empty token".into(),
        });
    }
    Ok(SecretString::from(token.to_owned()))
}
