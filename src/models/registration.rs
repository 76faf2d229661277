//! Wire types for hub registration
//!
//! Field names are the hub's wire contract; renames pin them to the exact
//! JSON keys the hub expects.

use serde::{Deserialize, Serialize};

/// Wire dialect advertised for every capability entry
pub const SELENIUM_PROTOCOL: &str = "WebDriver";

/// Registration class tag expected by the hub
pub const REGISTRATION_CLASS: &str = "org.openqa.grid.common.RegistrationRequest";

/// Proxy class tag expected by the hub
pub const PROXY_CLASS: &str = "org.openqa.grid.selenium.proxy.DefaultRemoteProxy";

/// One advertised (browser, version) combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubCapability {
    #[serde(rename = "browserName")]
    pub browser_name: String,
    pub version: String,
    #[serde(rename = "maxInstances")]
    pub max_instances: u32,
    pub platform: String,
    #[serde(rename = "platformName")]
    pub platform_name: String,
    #[serde(rename = "seleniumProtocol")]
    pub selenium_protocol: String,
}

/// The node's advertised configuration, built once and frozen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    #[serde(rename = "browsertimeout")]
    pub browser_timeout: u64,
    pub capabilities: Vec<HubCapability>,
    pub debug: bool,
    pub host: String,
    #[serde(rename = "maxSession")]
    pub max_session: u32,
    pub id: String,
    pub port: u16,
    #[serde(rename = "remoteHost")]
    pub remote_host: String,
    pub proxy: String,
    #[serde(rename = "nodeStatusCheckTimeout")]
    pub node_status_check_timeout: u64,
    #[serde(rename = "unregisterIfStillDownAfter")]
    pub unregister_if_still_down_after: u64,
}

/// The complete payload POSTed to the hub's registration endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationEnvelope {
    pub name: String,
    pub description: String,
    pub class: String,
    pub configuration: NodeDescriptor,
}

/// Hub's answer to a proxy-status query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HubStatusReply {
    #[serde(rename = "msg")]
    pub message: String,
    pub success: bool,
}
