//! Outbound address resolution
//!
//! The hub needs an address it can reach the node on. Binding a UDP socket
//! and connecting it toward a routable endpoint makes the OS pick the
//! outbound interface for that route; reading the socket's local address
//! back yields the node's hub-reachable IP. Nothing is sent on the wire.

use std::net::{IpAddr, UdpSocket};

use crate::models::{NodeError, NodeResult};

/// Always-routable endpoint used only for route selection
const PROBE_ENDPOINT: &str = "8.8.8.8:80";

/// Determine the IP address the node is reachable on from the hub's side.
///
/// Failure here is fatal to startup: without an address the node cannot form
/// its identity and nothing can locate it.
pub fn resolve_outbound_address() -> NodeResult<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0")
        .map_err(|e| NodeError::AddressResolution(e.to_string()))?;
    socket
        .connect(PROBE_ENDPOINT)
        .map_err(|e| NodeError::AddressResolution(e.to_string()))?;
    let local = socket
        .local_addr()
        .map_err(|e| NodeError::AddressResolution(e.to_string()))?;

    Ok(local.ip())
}
