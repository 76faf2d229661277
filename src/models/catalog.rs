//! Capacity catalog snapshot
//!
//! The browser catalog and total capacity are owned by the session
//! orchestration engine. This component only ever sees a point-in-time
//! snapshot taken at startup; capability changes while running require a
//! fresh snapshot and a fresh envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Immutable snapshot of the node's session capacity and browser catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityCatalog {
    /// Total concurrent sessions this node accepts, across all browsers
    pub total_sessions: u32,
    /// Browser name -> supported version identifiers
    pub browsers: BTreeMap<String, BTreeSet<String>>,
    /// When this snapshot was taken
    pub captured_at: DateTime<Utc>,
}

impl CapacityCatalog {
    /// Create an empty catalog with the given total capacity
    pub fn new(total_sessions: u32) -> Self {
        Self {
            total_sessions,
            browsers: BTreeMap::new(),
            captured_at: Utc::now(),
        }
    }

    /// Add a supported (browser, version) pair
    pub fn with_version(mut self, browser: impl Into<String>, version: impl Into<String>) -> Self {
        self.browsers
            .entry(browser.into())
            .or_default()
            .insert(version.into());
        self
    }

    /// Number of distinct (browser, version) pairs in the catalog
    pub fn version_count(&self) -> usize {
        self.browsers.values().map(|versions| versions.len()).sum()
    }
}

impl Default for CapacityCatalog {
    fn default() -> Self {
        Self::new(0)
    }
}
