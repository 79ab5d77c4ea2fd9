//! Entity toggling core between `fass-api` and the shell.
//!
//! This crate owns the domain model and the connect/load/command cycle
//! for a single Home Assistant hub:
//!
//! - **[`Session`]**: probes the hub, loads lights then switches into an
//!   immutable [`EntitySnapshot`], and dispatches commands. Failures go to
//!   the [`NoticeSender`] instead of aborting.
//!
//! - **[`HubProtocol`]**: the seam between the session and the hub.
//!   Implemented for [`fass_api::HubClient`]; tests use scripted fakes.
//!
//! - **[`classify`]**: keeps only entities whose state is exactly `on` or
//!   `off`, in hub order.
//!
//! - **[`ToggleViewModel`]**: per-entity optimistic state. A flip shows
//!   immediately and is reverted if the hub refuses the matching
//!   [`ToggleCommand`].

pub mod classify;
pub mod command;
pub mod config;
pub mod convert;
pub mod error;
pub mod hub;
pub mod model;
pub mod notice;
pub mod session;
pub mod snapshot;
pub mod view_model;

// ── Primary re-exports ──────────────────────────────────────────────
pub use classify::classify;
pub use command::{CommandOutcome, ToggleCommand, dispatch};
pub use config::ConnectionConfig;
pub use error::CoreError;
pub use hub::HubProtocol;
pub use model::{BinaryEntity, Domain, EntityId, EntityIdError, EntityState, ToggleableEntity};
pub use notice::{Notice, NoticeReceiver, NoticeSender, notice_channel};
pub use session::{ConnectionState, Session};
pub use snapshot::EntitySnapshot;
pub use view_model::ToggleViewModel;

pub use fass_api::Service;
