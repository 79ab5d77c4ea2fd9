// ── Wire → domain conversion ──
//
// fass-api speaks `StateResponse`; everything above it speaks
// `EntityState`. Malformed ids never make it across.

use fass_api::StateResponse;

use crate::model::{EntityId, EntityIdError, EntityState};

impl TryFrom<StateResponse> for EntityState {
    type Error = EntityIdError;

    fn try_from(state: StateResponse) -> Result<Self, Self::Error> {
        let friendly_name = state.friendly_name().map(str::to_owned);
        let entity_id = EntityId::try_from(state.entity_id)?;
        let friendly_name = friendly_name.unwrap_or_else(|| entity_id.to_string());

        Ok(EntityState::new(entity_id, friendly_name, state.state))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> StateResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn friendly_name_is_used_when_present() {
        let state = EntityState::try_from(response(json!({
            "entity_id": "light.kitchen",
            "state": "on",
            "attributes": { "friendly_name": "Kitchen" }
        })))
        .unwrap();
        assert_eq!(state.friendly_name, "Kitchen");
        assert_eq!(state.domain, "light");
        assert_eq!(state.raw_state, "on");
    }

    #[test]
    fn missing_friendly_name_falls_back_to_id() {
        let state = EntityState::try_from(response(json!({
            "entity_id": "switch.fan",
            "state": "off"
        })))
        .unwrap();
        assert_eq!(state.friendly_name, "switch.fan");
    }

    #[test]
    fn malformed_id_is_rejected() {
        let result = EntityState::try_from(response(json!({
            "entity_id": "fan",
            "state": "on"
        })));
        assert!(result.is_err());
    }
}
