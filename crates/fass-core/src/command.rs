// ── Command dispatch ──
//
// A toggle is expressed as the state the user wants, not as a flip.
// Each dispatch resolves the target afresh on the hub and never retries.

use fass_api::Service;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::CoreError;
use crate::hub::HubProtocol;
use crate::model::EntityId;
use crate::notice::NoticeSender;

/// Drive one entity to an explicit on/off state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleCommand {
    pub entity_id: EntityId,
    pub desired_state: bool,
}

impl ToggleCommand {
    pub fn new(entity_id: EntityId, desired_state: bool) -> Self {
        Self {
            entity_id,
            desired_state,
        }
    }

    /// `turn_on` for `true`, `turn_off` for `false`.
    pub fn service(&self) -> Service {
        if self.desired_state {
            Service::TurnOn
        } else {
            Service::TurnOff
        }
    }
}

/// What happened to a dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub command: ToggleCommand,
    pub result: Result<(), CoreError>,
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&CoreError> {
        self.result.as_ref().err()
    }
}

/// Send `command` to the hub. Failures are reported on `notices` and
/// returned in the outcome; they never propagate as a panic or `Err`.
pub async fn dispatch<H: HubProtocol>(
    hub: &H,
    command: ToggleCommand,
    notices: &NoticeSender,
) -> CommandOutcome {
    let result = hub
        .send_command(&command.entity_id, command.service())
        .await;

    match &result {
        Ok(()) => info!(
            entity_id = %command.entity_id,
            desired_state = command.desired_state,
            "command accepted"
        ),
        Err(e) => {
            warn!(entity_id = %command.entity_id, error = %e, "command failed");
            notices.error(e.clone());
        }
    }

    CommandOutcome { command, result }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn desired_state_picks_service() {
        let id: EntityId = "light.kitchen".parse().unwrap();
        assert_eq!(ToggleCommand::new(id.clone(), true).service(), Service::TurnOn);
        assert_eq!(ToggleCommand::new(id, false).service(), Service::TurnOff);
    }
}
