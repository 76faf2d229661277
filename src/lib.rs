//! Grid Node - Registration & Heartbeat Agent
//!
//! A worker node's self-registration protocol for a browser-automation
//! grid, providing:
//! - Outbound (hub-reachable) address resolution
//! - Capability/registration envelope construction
//! - Periodic liveness check with conditional re-registration

pub mod config;
pub mod models;
pub mod registration;

// Re-export commonly used types
pub use config::Settings;
pub use models::{
    CapacityCatalog, HubCapability, HubStatusReply, NodeDescriptor, NodeError, NodeResult,
    RegistrationEnvelope,
};
pub use registration::{build_envelope, resolve_outbound_address, HeartbeatDriver, NodeIdentity};

/// Version of the grid-node agent
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
