// ── Entity snapshot ──
//
// The result of one full load: the lights and switches that can be
// toggled, in hub order. Replaced wholesale on every refresh.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{Domain, EntityId, EntityState, ToggleableEntity};
use crate::view_model::ToggleViewModel;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntitySnapshot {
    lights: Vec<ToggleableEntity>,
    switches: Vec<ToggleableEntity>,
    /// `None` for the empty snapshot shown after a failed load.
    fetched_at: Option<DateTime<Utc>>,
}

impl EntitySnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from the two per-domain state lists. Each list is
    /// classified on its own; entities of the wrong domain are dropped.
    pub fn from_states(
        lights: impl IntoIterator<Item = EntityState>,
        switches: impl IntoIterator<Item = EntityState>,
    ) -> Self {
        Self {
            lights: crate::classify::toggleables(Domain::Light, lights),
            switches: crate::classify::toggleables(Domain::Switch, switches),
            fetched_at: Some(Utc::now()),
        }
    }

    pub fn lights(&self) -> &[ToggleableEntity] {
        &self.lights
    }

    pub fn switches(&self) -> &[ToggleableEntity] {
        &self.switches
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty() && self.switches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lights.len() + self.switches.len()
    }

    /// Lights first, then switches.
    pub fn iter(&self) -> impl Iterator<Item = &ToggleableEntity> {
        self.lights.iter().chain(&self.switches)
    }

    pub fn find(&self, entity_id: &EntityId) -> Option<&ToggleableEntity> {
        self.iter().find(|e| e.entity_id() == entity_id)
    }

    /// One view model per entity, lights first.
    pub fn view_models(&self) -> Vec<ToggleViewModel> {
        self.iter().map(ToggleViewModel::from_entity).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn state(id: &str, raw: &str) -> EntityState {
        EntityState::new(id.parse().unwrap(), id, raw)
    }

    #[test]
    fn empty_snapshot_has_no_timestamp() {
        let snap = EntitySnapshot::empty();
        assert!(snap.is_empty());
        assert!(snap.fetched_at().is_none());
    }

    #[test]
    fn from_states_classifies_each_domain() {
        let snap = EntitySnapshot::from_states(
            vec![state("light.kitchen", "on"), state("light.porch", "unavailable")],
            vec![state("switch.fan", "off"), state("light.stray", "on")],
        );
        assert_eq!(snap.lights().len(), 1);
        assert_eq!(snap.switches().len(), 1);
        assert_eq!(snap.len(), 2);
        assert!(snap.fetched_at().is_some());

        let fan: EntityId = "switch.fan".parse().unwrap();
        assert!(!snap.find(&fan).unwrap().is_on());
        assert!(snap.find(&"light.porch".parse().unwrap()).is_none());
    }

    #[test]
    fn view_models_are_lights_first() {
        let snap = EntitySnapshot::from_states(
            vec![state("light.kitchen", "on")],
            vec![state("switch.fan", "off")],
        );
        let ids: Vec<String> = snap
            .view_models()
            .iter()
            .map(|vm| vm.entity_id.to_string())
            .collect();
        assert_eq!(ids, vec!["light.kitchen", "switch.fan"]);
    }
}
