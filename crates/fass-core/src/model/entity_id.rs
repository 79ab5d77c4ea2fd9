// ── Core identity types ──
//
// EntityId and Domain form the foundation of every domain type.
// An entity id is `<domain>.<object_id>`; the domain decides which
// collection (lights or switches) an entity lands in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Domain ──────────────────────────────────────────────────────────

/// The toggleable domains the core knows about.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Domain {
    Light,
    Switch,
}

impl Domain {
    /// Fetch order: lights first, then switches.
    pub const ALL: [Domain; 2] = [Domain::Light, Domain::Switch];

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

// ── EntityId ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid entity id {0:?}: expected <domain>.<object_id>")]
pub struct EntityIdError(pub String);

/// Hub-assigned entity identifier, e.g. `light.kitchen`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The raw domain prefix (`light` in `light.kitchen`).
    pub fn domain_str(&self) -> &str {
        self.parts().0
    }

    pub fn object_id(&self) -> &str {
        self.parts().1
    }

    /// The domain, if it is one of the toggleable ones.
    pub fn domain(&self) -> Option<Domain> {
        self.domain_str().parse().ok()
    }

    fn parts(&self) -> (&str, &str) {
        // Validated on construction.
        self.0.split_once('.').unwrap_or((self.0.as_str(), ""))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityId {
    type Err = EntityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl TryFrom<String> for EntityId {
    type Error = EntityIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if fass_api::split_entity_id(&s).is_some() {
            Ok(Self(s))
        } else {
            Err(EntityIdError(s))
        }
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_parts() {
        let id: EntityId = "light.kitchen".parse().unwrap();
        assert_eq!(id.domain_str(), "light");
        assert_eq!(id.object_id(), "kitchen");
        assert_eq!(id.domain(), Some(Domain::Light));
    }

    #[test]
    fn entity_id_other_domain() {
        let id: EntityId = "sensor.temperature".parse().unwrap();
        assert_eq!(id.domain(), None);
    }

    #[test]
    fn entity_id_rejects_missing_separator() {
        assert!("kitchen".parse::<EntityId>().is_err());
        assert!("light.".parse::<EntityId>().is_err());
    }

    #[test]
    fn entity_id_serde_is_a_plain_string() {
        let id: EntityId = "switch.fan".parse().unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"switch.fan\"");
        assert!(serde_json::from_str::<EntityId>("\"nope\"").is_err());
    }

    #[test]
    fn domain_round_trips_through_str() {
        for domain in Domain::ALL {
            assert_eq!(domain.as_str().parse::<Domain>().unwrap(), domain);
        }
        assert_eq!(Domain::Switch.to_string(), "switch");
    }
}
