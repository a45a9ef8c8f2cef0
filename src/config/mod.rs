// src/config/mod.rs

use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

/// Redfish service root, used for readiness probes and the first check.
pub const SERVICE_ROOT_PATH: &str = "/redfish/v1/";
/// Specific system instance exposed by OpenBMC.
pub const SYSTEM_PATH: &str = "/redfish/v1/Systems/system";
/// Managers collection (informational check only).
pub const MANAGERS_PATH: &str = "/redfish/v1/Managers";

/// Directory where JUnit/HTML report artifacts are written.
pub const RESULTS_DIR: &str = "test-results";

/// BMC endpoint and credentials, read once at startup.
#[derive(Debug, Clone)]
pub struct BmcConfig {
    pub base_url: Url,
    pub username: String,
    pub password: String,
}

impl BmcConfig {
    /// Build from `BMC_URL` / `BMC_USERNAME` / `BMC_PASSWORD`, falling back
    /// to the stock OpenBMC defaults when unset.
    pub fn from_env() -> Result<Self> {
        let raw_url = std::env::var("BMC_URL")
            .unwrap_or_else(|_| "https://localhost:2443".to_string());
        let base_url = Url::parse(&raw_url)
            .with_context(|| format!("Invalid BMC_URL: {}", raw_url))?;

        Ok(Self {
            base_url,
            username: std::env::var("BMC_USERNAME")
                .unwrap_or_else(|_| "root".to_string()),
            password: std::env::var("BMC_PASSWORD")
                .unwrap_or_else(|_| "0penBmc".to_string()),
        })
    }
}

/// Timing knobs for the readiness poller.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub max_attempts: u32,
    pub interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        // 30 attempts x 10s interval: five minutes max.
        Self {
            max_attempts: 30,
            interval_secs: 10,
            request_timeout_secs: 5,
        }
    }
}

/// Timing knobs for the delegated pytest invocation.
#[derive(Debug, Clone)]
pub struct ApiTestConfig {
    pub timeout_secs: u64,
}

impl ApiTestConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiTestConfig {
    fn default() -> Self {
        Self { timeout_secs: 120 }
    }
}
