// ── Entity domain types ──

use serde::{Deserialize, Serialize};

use super::entity_id::{Domain, EntityId};
use crate::command::ToggleCommand;

/// One entity as reported by a full state fetch.
///
/// Produced fresh on every fetch; never diffed against an earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityState {
    pub entity_id: EntityId,
    pub friendly_name: String,
    /// Entity id prefix before the first `.`.
    pub domain: String,
    pub raw_state: String,
}

impl EntityState {
    pub fn new(
        entity_id: EntityId,
        friendly_name: impl Into<String>,
        raw_state: impl Into<String>,
    ) -> Self {
        let domain = entity_id.domain_str().to_owned();
        Self {
            entity_id,
            friendly_name: friendly_name.into(),
            domain,
            raw_state: raw_state.into(),
        }
    }

    /// `Some(true)` for `"on"`, `Some(false)` for `"off"`, else `None`.
    pub fn binary_state(&self) -> Option<bool> {
        match self.raw_state.as_str() {
            "on" => Some(true),
            "off" => Some(false),
            _ => None,
        }
    }
}

/// The data every toggleable entity carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryEntity {
    pub entity_id: EntityId,
    pub display_name: String,
    pub is_on: bool,
}

/// A light or a switch whose state is strictly on/off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "domain", rename_all = "lowercase")]
pub enum ToggleableEntity {
    Light(BinaryEntity),
    Switch(BinaryEntity),
}

impl ToggleableEntity {
    /// `None` unless the state is exactly on/off and the domain is known.
    pub fn from_state(state: &EntityState) -> Option<Self> {
        let is_on = state.binary_state()?;
        let inner = BinaryEntity {
            entity_id: state.entity_id.clone(),
            display_name: state.friendly_name.clone(),
            is_on,
        };
        match state.entity_id.domain()? {
            Domain::Light => Some(Self::Light(inner)),
            Domain::Switch => Some(Self::Switch(inner)),
        }
    }

    fn inner(&self) -> &BinaryEntity {
        match self {
            Self::Light(e) | Self::Switch(e) => e,
        }
    }

    pub fn domain(&self) -> Domain {
        match self {
            Self::Light(_) => Domain::Light,
            Self::Switch(_) => Domain::Switch,
        }
    }

    pub fn entity_id(&self) -> &EntityId {
        &self.inner().entity_id
    }

    pub fn display_name(&self) -> &str {
        &self.inner().display_name
    }

    pub fn is_on(&self) -> bool {
        self.inner().is_on
    }

    /// The command that would drive this entity to `desired_state`.
    pub fn command(&self, desired_state: bool) -> ToggleCommand {
        ToggleCommand::new(self.entity_id().clone(), desired_state)
    }
}
