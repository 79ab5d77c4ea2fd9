// ── Toggle view-model ──
//
// One per displayed entity. `is_on` moves immediately when the user
// flips it; `last_confirmed` is what the hub last agreed to. A failed
// command puts `is_on` back.

use serde::Serialize;

use crate::command::{CommandOutcome, ToggleCommand};
use crate::model::{Domain, EntityId, EntityState, ToggleableEntity};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleViewModel {
    pub entity_id: EntityId,
    pub display_name: String,
    pub domain: Domain,
    /// What the user sees.
    pub is_on: bool,
    /// Last state known to be true on the hub.
    pub last_confirmed: bool,
}

impl ToggleViewModel {
    pub fn from_entity(entity: &ToggleableEntity) -> Self {
        Self {
            entity_id: entity.entity_id().clone(),
            display_name: entity.display_name().to_owned(),
            domain: entity.domain(),
            is_on: entity.is_on(),
            last_confirmed: entity.is_on(),
        }
    }

    /// `None` when the state is not binary or the domain is not toggleable.
    pub fn from_state(state: &EntityState) -> Option<Self> {
        ToggleableEntity::from_state(state).map(|e| Self::from_entity(&e))
    }

    /// Record the user's intent optimistically and return the command
    /// to dispatch.
    pub fn request(&mut self, desired_state: bool) -> ToggleCommand {
        self.is_on = desired_state;
        ToggleCommand::new(self.entity_id.clone(), desired_state)
    }

    /// Settle the optimistic state once the hub has answered.
    ///
    /// Outcomes for other entities are ignored.
    pub fn reconcile(&mut self, outcome: &CommandOutcome) {
        if outcome.command.entity_id != self.entity_id {
            return;
        }
        if outcome.is_success() {
            self.last_confirmed = outcome.command.desired_state;
            self.is_on = outcome.command.desired_state;
        } else {
            self.is_on = self.last_confirmed;
        }
    }

    /// The displayed state has not been confirmed yet.
    pub fn is_pending(&self) -> bool {
        self.is_on != self.last_confirmed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn kitchen(raw: &str) -> ToggleViewModel {
        let state = EntityState::new("light.kitchen".parse().unwrap(), "Kitchen", raw);
        ToggleViewModel::from_state(&state).unwrap()
    }

    #[test]
    fn initial_state_matches_entity() {
        let vm = kitchen("on");
        assert!(vm.is_on);
        assert!(vm.last_confirmed);
        assert_eq!(vm.display_name, "Kitchen");
        assert_eq!(vm.domain, Domain::Light);
        assert!(!vm.is_pending());
    }

    #[test]
    fn non_binary_state_has_no_view_model() {
        let state = EntityState::new("light.porch".parse().unwrap(), "Porch", "unavailable");
        assert!(ToggleViewModel::from_state(&state).is_none());
    }

    #[test]
    fn request_is_optimistic() {
        let mut vm = kitchen("on");
        let cmd = vm.request(false);
        assert!(!vm.is_on);
        assert!(vm.is_pending());
        assert!(!cmd.desired_state);
        assert_eq!(cmd.entity_id, vm.entity_id);
    }

    #[test]
    fn success_confirms() {
        let mut vm = kitchen("on");
        let command = vm.request(false);
        vm.reconcile(&CommandOutcome {
            command,
            result: Ok(()),
        });
        assert!(!vm.is_on);
        assert!(!vm.last_confirmed);
    }

    #[test]
    fn failure_reverts() {
        let mut vm = kitchen("on");
        let command = vm.request(false);
        vm.reconcile(&CommandOutcome {
            command,
            result: Err(CoreError::NotConnected),
        });
        assert!(vm.is_on);
        assert!(!vm.is_pending());
    }

    #[test]
    fn outcome_for_other_entity_is_ignored() {
        let mut vm = kitchen("on");
        vm.request(false);
        vm.reconcile(&CommandOutcome {
            command: ToggleCommand::new("switch.fan".parse().unwrap(), true),
            result: Err(CoreError::NotConnected),
        });
        assert!(!vm.is_on);
    }
}
