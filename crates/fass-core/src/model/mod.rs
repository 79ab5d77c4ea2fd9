// ── Domain model ──
//
// Canonical types consumed by the shell. Wire types from fass-api are
// converted into these in `crate::convert`.

pub mod entity;
pub mod entity_id;

pub use entity::{BinaryEntity, EntityState, ToggleableEntity};
pub use entity_id::{Domain, EntityId, EntityIdError};
