// Async HTTP client for the Home Assistant REST API.
//
// Base path: /api/
// Auth: `Authorization: Bearer <token>` default header

use std::time::Duration;

use indexmap::IndexMap;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::Error;
use crate::transport::{TlsMode, TransportConfig, TrustWarning};
use crate::types::{ApiStatus, Service, ServiceTarget, StateResponse, split_entity_id};

// ── Client ───────────────────────────────────────────────────────────

/// Async client for a single hub.
///
/// Immutable once built: trust anchors, timeout, and the bearer token are
/// baked into the inner `reqwest::Client`. Build a new one when the
/// connection settings change.
#[derive(Debug, Clone)]
pub struct HubClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    trust_warning: Option<TrustWarning>,
}

/// Builder for [`HubClient`].
#[derive(Debug)]
pub struct HubClientBuilder {
    base_url: String,
    token: SecretString,
    transport: TransportConfig,
    trust_warning: Option<TrustWarning>,
}

impl HubClientBuilder {
    /// Append a PEM CA bundle to the trust pool.
    ///
    /// Never fails: a bundle that does not parse is recorded as a
    /// [`TrustWarning`] (see [`HubClient::trust_warning`]).
    pub fn configure_trust(mut self, ca_cert_pem: Option<&str>) -> Self {
        self.trust_warning = self.transport.configure_trust(ca_cert_pem);
        self
    }

    /// Override the request timeout (tests only need this).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<HubClient, Error> {
        let base_url = normalize_base_url(&self.base_url)?;
        let headers = bearer_headers(&self.token)?;
        let timeout = self.transport.timeout;
        let mut trust_warning = self.trust_warning;

        let http = match self.transport.build_client(headers.clone()) {
            Ok(http) => http,
            Err(e) if self.transport.has_custom_ca() => {
                let warning = TrustWarning {
                    reason: e.to_string(),
                };
                warn!("{warning}");
                trust_warning = Some(warning);
                TransportConfig {
                    tls: TlsMode::System,
                    timeout,
                }
                .build_client(headers)?
            }
            Err(e) => return Err(e),
        };

        Ok(HubClient {
            http,
            base_url,
            timeout,
            trust_warning,
        })
    }
}

impl HubClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Client trusting the system roots, with the default 10 s timeout.
    pub fn new(base_url: &str, token: &SecretString) -> Result<Self, Error> {
        Self::builder(base_url, token).build()
    }

    pub fn builder(base_url: &str, token: &SecretString) -> HubClientBuilder {
        HubClientBuilder {
            base_url: base_url.to_owned(),
            token: token.clone(),
            transport: TransportConfig::default(),
            trust_warning: None,
        }
    }

    /// The warning produced while configuring trust, if any.
    pub fn trust_warning(&self) -> Option<&TrustWarning> {
        self.trust_warning.as_ref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"states"`) onto the `/api/` base.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await.map_err(|e| self.transport_error(e))?;
        self.handle_response(resp).await
    }

    async fn post_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await.map_err(|e| self.transport_error(e))?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Error::InvalidToken;
        }

        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiStatus>(&raw)
            .map(|s| s.message)
            .unwrap_or(raw);

        Error::Hub {
            status: status.as_u16(),
            message: if message.is_empty() {
                status.to_string()
            } else {
                message
            },
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Reachability + auth probe. Must succeed before the client is used.
    pub async fn check_api(&self) -> Result<(), Error> {
        let status: ApiStatus = self.get("").await?;
        debug!(message = %status.message, "hub API reachable");
        Ok(())
    }

    /// Every state the hub reports, in response order.
    ///
    /// Entries that do not decode as a state object are skipped.
    pub async fn list_states(&self) -> Result<Vec<StateResponse>, Error> {
        let raw: Vec<serde_json::Value> = self.get("states").await?;
        let total = raw.len();

        let states: Vec<StateResponse> = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(state) => Some(state),
                Err(e) => {
                    debug!(error = %e, "skipping malformed state entry");
                    None
                }
            })
            .collect();

        debug!(total, decoded = states.len(), "fetched hub states");
        Ok(states)
    }

    /// States whose entity id has the given domain prefix, keyed by id.
    ///
    /// Preserves response order. Entries with malformed ids are skipped.
    pub async fn filter_states(
        &self,
        domain: &str,
    ) -> Result<IndexMap<String, StateResponse>, Error> {
        let mut filtered = IndexMap::new();
        for state in self.list_states().await? {
            match state.domain() {
                Some(d) if d == domain => {
                    filtered.insert(state.entity_id.clone(), state);
                }
                Some(_) => {}
                None => debug!(entity_id = %state.entity_id, "skipping malformed entity id"),
            }
        }
        Ok(filtered)
    }

    /// Current state of a single entity.
    pub async fn get_state(&self, entity_id: &str) -> Result<StateResponse, Error> {
        if split_entity_id(entity_id).is_none() {
            return Err(Error::InvalidEntityId {
                entity_id: entity_id.to_owned(),
            });
        }

        match self.get(&format!("states/{entity_id}")).await {
            Err(e) if e.is_not_found() => Err(Error::NotFound {
                entity_id: entity_id.to_owned(),
            }),
            other => other,
        }
    }

    /// Resolve a commandable device handle from a fresh state lookup.
    pub async fn get_device(&self, entity_id: &str) -> Result<Device<'_>, Error> {
        let state = self.get_state(entity_id).await?;
        let kind = match state.domain() {
            Some("light") => DeviceKind::Light,
            Some("switch") => DeviceKind::Switch,
            _ => {
                return Err(Error::UnsupportedDomain {
                    entity_id: entity_id.to_owned(),
                });
            }
        };
        Ok(Device {
            client: self,
            kind,
            state,
        })
    }

    /// `POST /api/services/{domain}/{service}` for one entity.
    pub async fn call_service(
        &self,
        domain: &str,
        service: Service,
        entity_id: &str,
    ) -> Result<(), Error> {
        self.post_no_response(
            &format!("services/{domain}/{}", service.as_str()),
            &ServiceTarget { entity_id },
        )
        .await
    }
}

// ── Device handle ────────────────────────────────────────────────────

/// Which kind of controllable device a handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Light,
    Switch,
}

impl DeviceKind {
    pub fn domain(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Switch => "switch",
        }
    }
}

/// A resolved, commandable reference to a light or switch.
///
/// Commands report success or failure only; the hub stays the source of
/// truth and nothing local is updated.
#[derive(Debug, Clone)]
pub struct Device<'a> {
    client: &'a HubClient,
    kind: DeviceKind,
    state: StateResponse,
}

impl Device<'_> {
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn entity_id(&self) -> &str {
        &self.state.entity_id
    }

    /// The state snapshot the handle was resolved from.
    pub fn state(&self) -> &StateResponse {
        &self.state
    }

    pub async fn turn_on(&self) -> Result<(), Error> {
        self.send(Service::TurnOn).await
    }

    pub async fn turn_off(&self) -> Result<(), Error> {
        self.send(Service::TurnOff).await
    }

    pub async fn toggle(&self) -> Result<(), Error> {
        self.send(Service::Toggle).await
    }

    pub async fn send(&self, service: Service) -> Result<(), Error> {
        self.client
            .call_service(self.kind.domain(), service, self.entity_id())
            .await
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Build the `/api/` base URL, keeping any reverse-proxy path prefix.
///
/// `https://hub.local` → `https://hub.local/api/`
/// `https://hub.local/ha/` → `https://hub.local/ha/api/`
fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw.trim())?;
    let path = url.path().trim_end_matches('/').to_owned();

    if path.ends_with("/api") {
        url.set_path(&format!("{path}/"));
    } else {
        url.set_path(&format!("{path}/api/"));
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

fn bearer_headers(token: &SecretString) -> Result<HeaderMap, Error> {
    let token = token.expose_secret().trim();
    if token.is_empty() {
        return Err(Error::Authentication {
            message: "access token is empty".into(),
        });
    }

    let mut value =
        HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| Error::Authentication {
            message: format!("invalid access token header value: {e}"),
        })?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}
