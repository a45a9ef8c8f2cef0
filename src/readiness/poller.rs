// src/readiness/poller.rs

use crate::client::RedfishClient;
use crate::config::{PollerConfig, SERVICE_ROOT_PATH};
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Polls the Redfish service root until the BMC answers with 200.
pub struct ReadinessPoller {
    config: PollerConfig,
    client: RedfishClient,
}

impl ReadinessPoller {
    pub fn new(config: PollerConfig, client: RedfishClient) -> Self {
        Self { config, client }
    }

    /// Probe the service root up to `max_attempts` times, sleeping a fixed
    /// interval between attempts. Returns true on the first 200 response.
    ///
    /// Transport errors and non-200 statuses are the same thing here: one
    /// failed attempt. The status detail is never inspected beyond the 200
    /// comparison.
    pub async fn wait_until_ready(&self) -> bool {
        info!("Waiting for BMC at {}...", self.client.base_url());

        for attempt in 0..self.config.max_attempts {
            match self.client.get(SERVICE_ROOT_PATH).await {
                Ok(response) if response.status().as_u16() == 200 => {
                    info!("BMC is ready!");
                    return true;
                }
                Ok(response) => {
                    debug!("BMC not ready yet: HTTP {}", response.status());
                }
                Err(e) => {
                    debug!("BMC not ready yet: {}", e);
                }
            }

            if attempt % 5 == 0 {
                info!(
                    "Still waiting... ({}s)",
                    u64::from(attempt) * self.config.interval_secs
                );
            }
            sleep(self.config.interval()).await;
        }

        warn!("Timeout waiting for BMC");
        false
    }
}
