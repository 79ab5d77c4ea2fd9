// ── Session ──
//
// Owns the hub connection for one configuration. Startup probes the hub,
// then loads lights and switches one after the other. Every failure is
// reported on the notice channel; none of them panics or aborts the
// shell. A config change means a new session.

use std::sync::Arc;

use fass_api::{HubClient, Service};
use tracing::{debug, info, warn};

use crate::command::{self, CommandOutcome, ToggleCommand};
use crate::config::ConnectionConfig;
use crate::error::CoreError;
use crate::hub::HubProtocol;
use crate::model::{Domain, EntityId};
use crate::notice::NoticeSender;
use crate::snapshot::EntitySnapshot;
use crate::view_model::ToggleViewModel;

/// Where the session stands with the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionState {
    /// The probe has not succeeded; the hub is not used for anything else.
    Failed,
    Connected,
}

pub struct Session<H: HubProtocol = HubClient> {
    hub: H,
    state: ConnectionState,
    snapshot: Arc<EntitySnapshot>,
    notices: NoticeSender,
}

impl Session<HubClient> {
    /// Build a client from `config` and start a session with it.
    ///
    /// Returns `Err` only when nothing could be attempted: an unset URL or
    /// token, or a URL the client refuses. Hub failures after that leave
    /// a session in [`ConnectionState::Failed`].
    pub async fn connect(config: &ConnectionConfig, notices: NoticeSender) -> Result<Self, CoreError> {
        config.validate()?;

        let client = HubClient::builder(&config.base_url, &config.bearer_token)
            .configure_trust(config.ca_cert())
            .build()?;

        if let Some(warning) = client.trust_warning() {
            notices.warning(warning.to_string());
        }

        Ok(Self::start(client, notices).await)
    }
}

impl<H: HubProtocol> Session<H> {
    /// Probe the hub and, if it answers, load the initial snapshot.
    pub async fn start(hub: H, notices: NoticeSender) -> Self {
        let mut session = Self {
            hub,
            state: ConnectionState::Failed,
            snapshot: Arc::new(EntitySnapshot::empty()),
            notices,
        };
        // Failures are already on the notice channel.
        let _ = session.refresh().await;
        session
    }

    /// Reload lights then switches and replace the snapshot.
    ///
    /// Re-probes first if the hub has not answered yet. On any failure the
    /// snapshot is emptied and the error reported.
    pub async fn refresh(&mut self) -> Result<(), CoreError> {
        let result = self.try_refresh().await;
        if let Err(e) = &result {
            warn!(error = %e, "entity refresh failed");
            self.snapshot = Arc::new(EntitySnapshot::empty());
            self.notices.error(e.clone());
        }
        result
    }

    async fn try_refresh(&mut self) -> Result<(), CoreError> {
        if self.state != ConnectionState::Connected {
            self.hub.check_api().await?;
            self.state = ConnectionState::Connected;
            info!("hub connected");
        }

        let lights = self.hub.filter_states(Domain::Light).await?;
        let switches = self.hub.filter_states(Domain::Switch).await?;
        debug!(
            lights = lights.len(),
            switches = switches.len(),
            "fetched entity states"
        );

        let snapshot = EntitySnapshot::from_states(lights.into_values(), switches.into_values());
        info!(
            lights = snapshot.lights().len(),
            switches = snapshot.switches().len(),
            "snapshot rebuilt"
        );
        self.snapshot = Arc::new(snapshot);
        Ok(())
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// The current snapshot. Never mutated; replaced by `refresh`.
    pub fn snapshot(&self) -> Arc<EntitySnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn view_models(&self) -> Vec<ToggleViewModel> {
        self.snapshot.view_models()
    }

    pub fn hub(&self) -> &H {
        &self.hub
    }

    /// Dispatch one command. The snapshot is left alone.
    pub async fn apply(&self, command: ToggleCommand) -> CommandOutcome {
        if let Err(e) = self.ensure_connected() {
            warn!(entity_id = %command.entity_id, error = %e, "command refused");
            self.notices.error(e.clone());
            return CommandOutcome {
                command,
                result: Err(e),
            };
        }
        command::dispatch(&self.hub, command, &self.notices).await
    }

    /// Flip `vm` to `desired_state`: show it immediately, send it, and
    /// revert if the hub refuses.
    pub async fn toggle(&self, vm: &mut ToggleViewModel, desired_state: bool) -> CommandOutcome {
        let command = vm.request(desired_state);
        let outcome = self.apply(command).await;
        vm.reconcile(&outcome);
        outcome
    }

    /// Invoke an arbitrary device service (e.g. the hub-side `toggle`).
    pub async fn send(&self, entity_id: &EntityId, service: Service) -> Result<(), CoreError> {
        let result = match self.ensure_connected() {
            Ok(()) => self.hub.send_command(entity_id, service).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            warn!(%entity_id, service = service.as_str(), error = %e, "service call failed");
            self.notices.error(e.clone());
        }
        result
    }

    fn ensure_connected(&self) -> Result<(), CoreError> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(CoreError::NotConnected)
        }
    }
}

impl<H: HubProtocol> std::fmt::Debug for Session<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("entities", &self.snapshot.len())
            .finish_non_exhaustive()
    }
}
