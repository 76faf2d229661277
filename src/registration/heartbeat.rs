//! Heartbeat driver
//!
//! Owns the recurring registration-check loop: each tick asks the hub
//! whether it still lists this node and re-submits the frozen registration
//! envelope when it does not. The loop is strictly sequential; a cycle in
//! flight always runs to completion before the next tick or a shutdown
//! signal is observed.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::models::{HubStatusReply, NodeResult, RegistrationEnvelope};

/// User agent identifying this node to the hub
const USER_AGENT: &str = "selenoid";

/// Periodic liveness check against the hub, with conditional re-registration
pub struct HeartbeatDriver {
    hub_url: String,
    node_id: String,
    /// Envelope serialized once at construction; every registration POST
    /// reuses these exact bytes for the lifetime of the process.
    frozen_envelope: Vec<u8>,
    client: reqwest::Client,
    interval: Duration,
    last_registered_at: Option<DateTime<Utc>>,
}

impl HeartbeatDriver {
    /// Create a driver for the given hub, freezing the envelope.
    pub fn new(
        hub_url: impl Into<String>,
        envelope: &RegistrationEnvelope,
        interval: Duration,
        client_timeout: Duration,
    ) -> NodeResult<Self> {
        let frozen_envelope = serde_json::to_vec(envelope)?;
        let client = reqwest::Client::builder().timeout(client_timeout).build()?;

        Ok(Self {
            hub_url: hub_url.into().trim_end_matches('/').to_string(),
            node_id: envelope.configuration.id.clone(),
            frozen_envelope,
            client,
            interval,
            last_registered_at: None,
        })
    }

    /// Identifier used as the hub's lookup key, `<ip>:<port>`
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Run registration-check cycles until the shutdown signal fires.
    ///
    /// The first cycle runs one full interval after entry, matching the
    /// fixed tick period. Dropping the shutdown sender also stops the loop.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Heartbeat started for node {} -> {}", self.node_id, self.hub_url);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.run_cycle().await,
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!(
            "Heartbeat stopped for node {} (last registered: {:?})",
            self.node_id, self.last_registered_at
        );
    }

    /// One registration-check cycle.
    ///
    /// Every failure path abandons the cycle silently; the next tick retries
    /// from scratch. A hub that cannot answer the status query would not
    /// accept a registration either.
    async fn run_cycle(&mut self) {
        let url = format!(
            "{}/grid/api/proxy?id={}",
            self.hub_url,
            urlencoding::encode(&self.node_id)
        );

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Status check failed: {}", e);
                return;
            }
        };

        if !response.status().is_success() {
            debug!("Status check returned {}", response.status());
            return;
        }

        // An undecodable reply is treated like a failed check: skip the
        // cycle rather than acting on a stale success flag.
        let reply: HubStatusReply = match response.json().await {
            Ok(reply) => reply,
            Err(e) => {
                debug!("Undecodable status reply: {}", e);
                return;
            }
        };

        if reply.success {
            return;
        }

        debug!("Hub does not list {} ({}), registering", self.node_id, reply.message);
        self.register().await;
    }

    /// Fire-and-forget registration POST.
    ///
    /// The response is not inspected: if the hub rejected or dropped it, the
    /// next cycle's status check still reports absence and retries.
    async fn register(&mut self) {
        let url = format!("{}/grid/register", self.hub_url);

        match self
            .client
            .post(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(self.frozen_envelope.clone())
            .send()
            .await
        {
            Ok(_) => {
                self.last_registered_at = Some(Utc::now());
                info!("Submitted registration for node {}", self.node_id);
            }
            Err(e) => debug!("Registration failed: {}", e),
        }
    }
}
