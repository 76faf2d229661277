//! Node agent configuration settings

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::models::CapacityCatalog;

/// Main node agent configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub hub: HubSettings,
    pub node: NodeSettings,
    #[serde(default)]
    pub heartbeat: HeartbeatSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
}

/// Hub endpoint settings
#[derive(Debug, Clone, Deserialize)]
pub struct HubSettings {
    /// Base URL of the dispatch hub
    #[serde(default = "default_hub_url")]
    pub url: String,
}

fn default_hub_url() -> String {
    "http://localhost:4444".to_string()
}

/// Node identity settings
#[derive(Debug, Clone, Deserialize)]
pub struct NodeSettings {
    /// Display name sent in the registration envelope
    #[serde(default = "default_node_name")]
    pub name: String,
    /// Description sent in the registration envelope
    #[serde(default = "default_node_description")]
    pub description: String,
    /// Address the node's session listener binds to, as host:port
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    /// Advertised browser session timeout in seconds
    #[serde(default = "default_browser_timeout")]
    pub browser_timeout_sec: u64,
}

fn default_node_name() -> String {
    "grid-node-registration".to_string()
}

fn default_node_description() -> String {
    "grid node".to_string()
}

fn default_listen_address() -> String {
    "0.0.0.0:4444".to_string()
}

fn default_browser_timeout() -> u64 {
    60
}

/// Heartbeat loop settings
#[derive(Debug, Clone, Deserialize)]
pub struct HeartbeatSettings {
    /// Seconds between registration-check cycles
    #[serde(default = "default_interval")]
    pub interval_sec: u64,
    /// Client-side timeout for hub requests in seconds
    #[serde(default = "default_client_timeout")]
    pub client_timeout_sec: u64,
}

fn default_interval() -> u64 {
    5
}

fn default_client_timeout() -> u64 {
    5
}

impl Default for HeartbeatSettings {
    fn default() -> Self {
        HeartbeatSettings {
            interval_sec: default_interval(),
            client_timeout_sec: default_client_timeout(),
        }
    }
}

/// Capacity snapshot source for the standalone binary
///
/// Embedders that already track capacity in-process construct a
/// [`CapacityCatalog`] directly instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSettings {
    /// Total concurrent sessions across all browsers
    #[serde(default)]
    pub total_sessions: u32,
    /// Browser name -> supported versions
    #[serde(default)]
    pub browsers: HashMap<String, Vec<String>>,
}

impl CatalogSettings {
    /// Take a point-in-time capacity snapshot from these settings
    pub fn snapshot(&self) -> CapacityCatalog {
        let mut catalog = CapacityCatalog::new(self.total_sessions);
        for (browser, versions) in &self.browsers {
            for version in versions {
                catalog = catalog.with_version(browser.clone(), version.clone());
            }
        }
        catalog
    }
}

impl Settings {
    /// Load settings from file and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load settings from a specific config file path (without extension)
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config_path = path.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("hub.url", default_hub_url())?
            .set_default("node.name", default_node_name())?
            .set_default("node.description", default_node_description())?
            .set_default("node.listen_address", default_listen_address())?
            .set_default("node.browser_timeout_sec", default_browser_timeout() as i64)?
            .set_default("heartbeat.interval_sec", default_interval() as i64)?
            .set_default("heartbeat.client_timeout_sec", default_client_timeout() as i64)?
            .set_default("catalog.total_sessions", 0)?
            // Add config file if it exists
            .add_source(File::with_name(config_path.to_str().unwrap_or("config")).required(false))
            // Add environment variables with prefix GRID_NODE_
            .add_source(Environment::with_prefix("GRID_NODE").separator("__"));

        builder.build()?.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            hub: HubSettings {
                url: default_hub_url(),
            },
            node: NodeSettings {
                name: default_node_name(),
                description: default_node_description(),
                listen_address: default_listen_address(),
                browser_timeout_sec: default_browser_timeout(),
            },
            heartbeat: HeartbeatSettings::default(),
            catalog: CatalogSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.hub.url, "http://localhost:4444");
        assert_eq!(settings.node.listen_address, "0.0.0.0:4444");
        assert_eq!(settings.heartbeat.interval_sec, 5);
        assert_eq!(settings.heartbeat.client_timeout_sec, 5);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[hub]
url = "http://hub.internal:4444"

[node]
listen_address = "0.0.0.0:5555"

[catalog]
total_sessions = 4

[catalog.browsers]
chrome = ["90", "91"]
firefox = ["88"]
"#
        )
        .unwrap();

        let settings = Settings::load_from(dir.path().join("config")).unwrap();
        assert_eq!(settings.hub.url, "http://hub.internal:4444");
        assert_eq!(settings.node.listen_address, "0.0.0.0:5555");
        // Unset sections fall back to defaults
        assert_eq!(settings.heartbeat.interval_sec, 5);

        let catalog = settings.catalog.snapshot();
        assert_eq!(catalog.total_sessions, 4);
        assert_eq!(catalog.version_count(), 3);
    }

    #[test]
    fn test_catalog_snapshot_empty() {
        let catalog = CatalogSettings::default().snapshot();
        assert_eq!(catalog.total_sessions, 0);
        assert_eq!(catalog.version_count(), 0);
    }
}
