// fass-api: Async Rust client for the Home Assistant REST API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::{Device, DeviceKind, HubClient, HubClientBuilder};
pub use error::Error;
pub use transport::{DEFAULT_TIMEOUT, TlsMode, TransportConfig, TrustWarning};
pub use types::{Service, StateResponse, split_entity_id};
