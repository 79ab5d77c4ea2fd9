// ── Entity classification ──
//
// The hub reports arbitrary state strings (effect lists, brightness text,
// "unavailable", ...). Only strictly binary entities can become toggles.

use crate::model::{Domain, EntityState, ToggleableEntity};

/// Keep exactly the entities whose raw state is `"on"` or `"off"`.
///
/// Input order is preserved.
pub fn classify(states: impl IntoIterator<Item = EntityState>) -> Vec<EntityState> {
    states
        .into_iter()
        .filter(|state| state.binary_state().is_some())
        .collect()
}

/// Classify and convert, keeping only entities of `domain`.
pub fn toggleables(
    domain: Domain,
    states: impl IntoIterator<Item = EntityState>,
) -> Vec<ToggleableEntity> {
    classify(states)
        .iter()
        .filter_map(ToggleableEntity::from_state)
        .filter(|entity| entity.domain() == domain)
        .collect()
}
