// Wire types for the Home Assistant REST API.
//
// Only the fields the client actually reads are modelled; everything
// else in a state object is ignored by serde.

use serde::{Deserialize, Serialize};

/// Response body of `GET /api/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiStatus {
    pub message: String,
}

/// One entry of `GET /api/states` or the body of `GET /api/states/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateResponse {
    pub entity_id: String,
    pub state: String,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl StateResponse {
    /// The domain prefix of the entity id, if the id is well formed.
    pub fn domain(&self) -> Option<&str> {
        split_entity_id(&self.entity_id).map(|(domain, _)| domain)
    }

    /// `attributes.friendly_name`, when present as a non-empty string.
    pub fn friendly_name(&self) -> Option<&str> {
        self.attributes
            .get("friendly_name")
            .and_then(serde_json::Value::as_str)
            .filter(|name| !name.is_empty())
    }
}

/// Body of a service call targeting a single entity.
#[derive(Debug, Serialize)]
pub(crate) struct ServiceTarget<'a> {
    pub entity_id: &'a str,
}

/// Device services the client can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    TurnOn,
    TurnOff,
    Toggle,
}

impl Service {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TurnOn => "turn_on",
            Self::TurnOff => "turn_off",
            Self::Toggle => "toggle",
        }
    }
}

/// Split `<domain>.<object_id>` into its two halves.
///
/// Both halves must be non-empty and made of ASCII alphanumerics or `_`.
/// Anything else (including a second `.`) is rejected.
pub fn split_entity_id(entity_id: &str) -> Option<(&str, &str)> {
    let (domain, object_id) = entity_id.split_once('.')?;
    let valid = |part: &str| {
        !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    };
    (valid(domain) && valid(object_id)).then_some((domain, object_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_well_formed_ids() {
        assert_eq!(split_entity_id("light.kitchen"), Some(("light", "kitchen")));
        assert_eq!(
            split_entity_id("switch.living_room_2"),
            Some(("switch", "living_room_2"))
        );
    }

    #[test]
    fn rejects_malformed_ids() {
        for bad in ["", "light", ".kitchen", "light.", "light.a.b", "light/../x", "li ght.x"] {
            assert_eq!(split_entity_id(bad), None, "{bad:?} should be rejected");
        }
    }

    #[test]
    fn friendly_name_ignores_empty_and_non_string() {
        let mut state: StateResponse = serde_json::from_value(serde_json::json!({
            "entity_id": "light.kitchen",
            "state": "on",
            "attributes": { "friendly_name": "" }
        }))
        .expect("valid state");
        assert_eq!(state.friendly_name(), None);

        state
            .attributes
            .insert("friendly_name".into(), serde_json::json!(42));
        assert_eq!(state.friendly_name(), None);

        state
            .attributes
            .insert("friendly_name".into(), serde_json::json!("Kitchen"));
        assert_eq!(state.friendly_name(), Some("Kitchen"));
    }

    #[test]
    fn missing_attributes_default_to_empty() {
        let state: StateResponse =
            serde_json::from_value(serde_json::json!({ "entity_id": "switch.fan", "state": "off" }))
                .expect("valid state");
        assert!(state.attributes.is_empty());
        assert_eq!(state.domain(), Some("switch"));
    }
}
