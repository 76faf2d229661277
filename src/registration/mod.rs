//! Hub registration module
//!
//! Implements outbound address resolution, registration envelope
//! construction, and the heartbeat loop that keeps the node known
//! to the hub.

mod address;
mod builder;
mod heartbeat;

pub use address::*;
pub use builder::*;
pub use heartbeat::*;
