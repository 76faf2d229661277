//! Registration envelope builder
//!
//! Pure transformation from a capacity snapshot and the node's network
//! identity into the hub's wire-format registration descriptor. The result
//! is built once at startup and frozen; catalog changes after that are not
//! reflected.

use std::net::IpAddr;

use crate::models::{
    CapacityCatalog, HubCapability, NodeDescriptor, NodeError, NodeResult, RegistrationEnvelope,
    PROXY_CLASS, REGISTRATION_CLASS, SELENIUM_PROTOCOL,
};

/// Hub-side liveness probe timeout advertised for this node, in milliseconds
const NODE_STATUS_CHECK_TIMEOUT_MS: u64 = 5000;

/// How long the hub keeps a silent node before dropping it, in milliseconds
const UNREGISTER_IF_STILL_DOWN_AFTER_MS: u64 = 60000;

/// Identity fields of the envelope that come from process configuration
#[derive(Debug, Clone)]
pub struct NodeIdentity {
    pub name: String,
    pub description: String,
}

/// Build the registration envelope the heartbeat driver will re-send for the
/// lifetime of the process.
///
/// One capability entry is emitted per (browser, version) pair in the
/// catalog. Every entry advertises the node's total session capacity as its
/// instance limit; the hub's admission model only tracks the total.
pub fn build_envelope(
    identity: &NodeIdentity,
    catalog: &CapacityCatalog,
    resolved_ip: IpAddr,
    listen_address: &str,
    browser_timeout_sec: u64,
) -> NodeResult<RegistrationEnvelope> {
    let port = split_listen_port(listen_address)?;
    let host = resolved_ip.to_string();
    let node_id = format!("{host}:{port}");

    Ok(RegistrationEnvelope {
        name: identity.name.clone(),
        description: identity.description.clone(),
        class: REGISTRATION_CLASS.to_string(),
        configuration: NodeDescriptor {
            browser_timeout: browser_timeout_sec,
            capabilities: generate_capabilities(catalog),
            debug: false,
            max_session: catalog.total_sessions,
            remote_host: format!("http://{node_id}"),
            id: node_id,
            host,
            port,
            proxy: PROXY_CLASS.to_string(),
            node_status_check_timeout: NODE_STATUS_CHECK_TIMEOUT_MS,
            unregister_if_still_down_after: UNREGISTER_IF_STILL_DOWN_AFTER_MS,
        },
    })
}

fn generate_capabilities(catalog: &CapacityCatalog) -> Vec<HubCapability> {
    let platform = std::env::consts::OS;

    catalog
        .browsers
        .iter()
        .flat_map(|(browser, versions)| {
            versions.iter().map(move |version| HubCapability {
                browser_name: browser.clone(),
                version: version.clone(),
                max_instances: catalog.total_sessions,
                platform: platform.to_string(),
                platform_name: platform.to_string(),
                selenium_protocol: SELENIUM_PROTOCOL.to_string(),
            })
        })
        .collect()
}

/// Split the port off a `host:port` listen address.
///
/// An unparsable port is a loud construction-time error rather than a silent
/// zero: a node registered on port 0 would be unreachable and the defect
/// would only show up hub-side.
fn split_listen_port(listen_address: &str) -> NodeResult<u16> {
    let (_, port) = listen_address
        .rsplit_once(':')
        .ok_or_else(|| NodeError::invalid_listen_address(listen_address, "missing port"))?;

    port.parse::<u16>()
        .map_err(|e| NodeError::invalid_listen_address(listen_address, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_identity() -> NodeIdentity {
        NodeIdentity {
            name: "grid-node-registration".to_string(),
            description: "grid node".to_string(),
        }
    }

    fn test_catalog() -> CapacityCatalog {
        CapacityCatalog::new(5)
            .with_version("chrome", "90")
            .with_version("chrome", "91")
            .with_version("firefox", "88")
    }

    #[test]
    fn test_end_to_end_scenario() {
        let envelope = build_envelope(
            &test_identity(),
            &test_catalog(),
            "10.0.0.5".parse().unwrap(),
            "0.0.0.0:4444",
            60,
        )
        .unwrap();

        let config = &envelope.configuration;
        assert_eq!(config.capabilities.len(), 3);
        assert!(config.capabilities.iter().all(|c| c.max_instances == 5));
        assert_eq!(config.id, "10.0.0.5:4444");
        assert_eq!(config.remote_host, "http://10.0.0.5:4444");
        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.port, 4444);
        assert_eq!(config.max_session, 5);
        assert_eq!(envelope.class, REGISTRATION_CLASS);
        assert_eq!(config.proxy, PROXY_CLASS);
    }

    #[test]
    fn test_one_entry_per_browser_version_pair() {
        let catalog = CapacityCatalog::new(2)
            .with_version("chrome", "100")
            .with_version("chrome", "101")
            .with_version("chrome", "102")
            .with_version("firefox", "99")
            .with_version("opera", "85");

        let envelope = build_envelope(
            &test_identity(),
            &catalog,
            "192.168.1.10".parse().unwrap(),
            "0.0.0.0:4445",
            30,
        )
        .unwrap();

        let capabilities = &envelope.configuration.capabilities;
        assert_eq!(capabilities.len(), catalog.version_count());
        // maxInstances reflects total capacity, never per-browser counts
        assert!(capabilities.iter().all(|c| c.max_instances == 2));
        assert!(capabilities
            .iter()
            .all(|c| c.selenium_protocol == SELENIUM_PROTOCOL));
        assert!(capabilities
            .iter()
            .all(|c| c.platform == c.platform_name));
    }

    #[test]
    fn test_repeated_builds_are_identical() {
        let catalog = test_catalog();
        let ip: IpAddr = "10.0.0.5".parse().unwrap();

        let first = build_envelope(&test_identity(), &catalog, ip, "0.0.0.0:4444", 60).unwrap();
        let second = build_envelope(&test_identity(), &catalog, ip, "0.0.0.0:4444", 60).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn test_empty_catalog_builds_empty_capabilities() {
        let envelope = build_envelope(
            &test_identity(),
            &CapacityCatalog::new(0),
            "10.0.0.5".parse().unwrap(),
            "0.0.0.0:4444",
            60,
        )
        .unwrap();

        assert!(envelope.configuration.capabilities.is_empty());
        assert_eq!(envelope.configuration.max_session, 0);
    }

    #[test]
    fn test_malformed_port_is_a_typed_error() {
        let result = build_envelope(
            &test_identity(),
            &test_catalog(),
            "10.0.0.5".parse().unwrap(),
            "0.0.0.0:not-a-port",
            60,
        );

        assert!(matches!(
            result,
            Err(NodeError::InvalidListenAddress { .. })
        ));
    }

    #[test]
    fn test_missing_port_is_a_typed_error() {
        let result = build_envelope(
            &test_identity(),
            &test_catalog(),
            "10.0.0.5".parse().unwrap(),
            "no-port-here",
            60,
        );

        assert!(matches!(
            result,
            Err(NodeError::InvalidListenAddress { .. })
        ));
    }
}
