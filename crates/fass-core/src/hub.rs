// ── Hub protocol seam ──
//
// The session talks to the hub only through this trait. `HubClient` is
// the production implementation; tests plug in scripted fakes.

use std::future::Future;

use fass_api::{HubClient, Service};
use indexmap::IndexMap;
use tracing::debug;

use crate::error::CoreError;
use crate::model::{Domain, EntityId, EntityState};

pub trait HubProtocol: Send + Sync {
    /// Reachability and authentication probe.
    fn check_api(&self) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Current states for one domain, in hub order, keyed by entity id.
    fn filter_states(
        &self,
        domain: Domain,
    ) -> impl Future<Output = Result<IndexMap<EntityId, EntityState>, CoreError>> + Send;

    /// Resolve the entity afresh and invoke `service` on it.
    fn send_command(
        &self,
        entity_id: &EntityId,
        service: Service,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

impl HubProtocol for HubClient {
    async fn check_api(&self) -> Result<(), CoreError> {
        HubClient::check_api(self).await.map_err(CoreError::from)
    }

    async fn filter_states(
        &self,
        domain: Domain,
    ) -> Result<IndexMap<EntityId, EntityState>, CoreError> {
        let raw = HubClient::filter_states(self, domain.as_str()).await?;

        let mut states = IndexMap::with_capacity(raw.len());
        for (_, response) in raw {
            match EntityState::try_from(response) {
                Ok(state) => {
                    states.insert(state.entity_id.clone(), state);
                }
                Err(e) => debug!(error = %e, "dropping state with malformed id"),
            }
        }
        Ok(states)
    }

    async fn send_command(&self, entity_id: &EntityId, service: Service) -> Result<(), CoreError> {
        let device = self.get_device(entity_id.as_str()).await?;
        debug!(
            entity_id = %entity_id,
            service = service.as_str(),
            "sending command"
        );
        device.send(service).await?;
        Ok(())
    }
}
