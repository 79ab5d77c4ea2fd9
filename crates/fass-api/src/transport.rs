// Shared transport configuration for building reqwest::Client instances.
//
// Holds the trust anchors and the request timeout. A custom CA bundle is
// appended on top of the operating system's root store; one that fails to
// parse leaves the system roots in place and produces a `TrustWarning`.

use std::time::Duration;

use reqwest::header::HeaderMap;
use rustls_pki_types::CertificateDer;
use rustls_pki_types::pem::PemObject;
use tracing::{debug, warn};

use crate::Error;

/// Fixed per-request timeout for every hub call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Which certificates the client trusts.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// The operating system's root store (plus the bundled webpki roots).
    #[default]
    System,
    /// System roots plus the given DER-encoded CA certificates.
    CustomCa(Vec<CertificateDer<'static>>),
}

/// Non-fatal trust configuration failure.
///
/// The client is still usable; it just trusts the system roots only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("No certs appended, using system certs only ({reason})")]
pub struct TrustWarning {
    pub reason: String,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Append the certificates in `ca_cert_pem` to the trust pool.
    ///
    /// `None` or blank text selects the system roots. Text that holds no
    /// parseable certificate also selects the system roots and returns a
    /// warning for the caller to surface.
    pub fn configure_trust(&mut self, ca_cert_pem: Option<&str>) -> Option<TrustWarning> {
        let pem = match ca_cert_pem.map(str::trim) {
            Some(pem) if !pem.is_empty() => pem,
            _ => {
                self.tls = TlsMode::System;
                return None;
            }
        };

        match parse_pem_bundle(pem) {
            Ok(certs) => {
                debug!(count = certs.len(), "custom CA certificates appended");
                self.tls = TlsMode::CustomCa(certs);
                None
            }
            Err(reason) => {
                self.tls = TlsMode::System;
                let warning = TrustWarning { reason };
                warn!("{warning}");
                Some(warning)
            }
        }
    }

    /// Build a `reqwest::Client` carrying the given default headers.
    pub fn build_client(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("fass/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);

        if let TlsMode::CustomCa(certs) = &self.tls {
            for der in certs {
                let cert = reqwest::Certificate::from_der(der.as_ref())
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    pub fn has_custom_ca(&self) -> bool {
        matches!(self.tls, TlsMode::CustomCa(_))
    }
}

/// Collect every well-formed CERTIFICATE block. Broken blocks are skipped;
/// the bundle is rejected only when nothing usable is left.
fn parse_pem_bundle(pem: &str) -> Result<Vec<CertificateDer<'static>>, String> {
    let mut certs = Vec::new();
    let mut first_error = None;
    for item in CertificateDer::pem_slice_iter(pem.as_bytes()) {
        match item {
            Ok(cert) => certs.push(cert),
            Err(e) => {
                warn!(error = ?e, "skipping malformed CA certificate block");
                first_error.get_or_insert(e);
            }
        }
    }

    if certs.is_empty() {
        return Err(first_error.map_or_else(
            || "no CERTIFICATE block found".into(),
            |e| format!("invalid CA certificate PEM: {e:?}"),
        ));
    }
    Ok(certs)
}
