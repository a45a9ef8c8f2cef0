// src/health/checker.rs

use crate::client::RedfishClient;
use crate::config::{MANAGERS_PATH, SERVICE_ROOT_PATH, SYSTEM_PATH};
use serde_json::Value;
use tracing::{info, warn};

/// Verdict threshold: the run passes when at least this many of the three
/// checks succeed. Checks 1 and 2 short-circuit on failure, so in practice
/// only check 3 can miss without sinking the run.
const PASS_THRESHOLD: u32 = 2;
const TOTAL_CHECKS: u32 = 3;

#[derive(Debug)]
pub struct CheckResult {
    pub name: &'static str,
    pub passed: bool,
    pub detail: Option<String>,
}

/// Runs the fixed battery of basic connection checks against the BMC.
///
/// Each check is attempted exactly once; there are no retries here. The
/// readiness poller has already established that the BMC answers at all.
pub struct HealthChecker {
    client: RedfishClient,
}

impl HealthChecker {
    pub fn new(client: RedfishClient) -> Self {
        Self { client }
    }

    /// Issue the three checks in fixed order and derive the verdict.
    ///
    /// Checks 1 (service root) and 2 (system instance) are mandatory: a
    /// non-200 there fails the whole runner immediately. Check 3 (managers
    /// collection) is informational only.
    pub async fn run(&self) -> bool {
        info!("Running basic connection tests...");
        let mut passed = 0u32;

        match self.check_service_root().await {
            r if r.passed => passed += 1,
            r => {
                warn!("{}: {}", r.name, r.detail.as_deref().unwrap_or("failed"));
                return false;
            }
        }

        match self.check_system().await {
            r if r.passed => passed += 1,
            r => {
                warn!("{}: {}", r.name, r.detail.as_deref().unwrap_or("failed"));
                return false;
            }
        }

        let managers = self.check_managers().await;
        if managers.passed {
            passed += 1;
        }

        info!(
            "Basic connection: {}/{} tests passed",
            passed, TOTAL_CHECKS
        );
        passed >= PASS_THRESHOLD
    }

    async fn check_service_root(&self) -> CheckResult {
        match self.client.get(SERVICE_ROOT_PATH).await {
            Ok(response) if response.status().as_u16() == 200 => {
                info!("Service Root: Connected");
                CheckResult {
                    name: "Service Root",
                    passed: true,
                    detail: None,
                }
            }
            Ok(response) => CheckResult {
                name: "Service Root",
                passed: false,
                detail: Some(format!("Failed with status {}", response.status())),
            },
            Err(e) => CheckResult {
                name: "Service Root",
                passed: false,
                detail: Some(e.to_string()),
            },
        }
    }

    async fn check_system(&self) -> CheckResult {
        match self.client.get(SYSTEM_PATH).await {
            Ok(response) if response.status().as_u16() == 200 => {
                // PowerState is extracted for display only.
                let power_state = match response.json::<Value>().await {
                    Ok(body) => body
                        .get("PowerState")
                        .and_then(Value::as_str)
                        .unwrap_or("Unknown")
                        .to_string(),
                    Err(_) => "Unknown".to_string(),
                };
                info!("System Info: PowerState={}", power_state);
                CheckResult {
                    name: "System Info",
                    passed: true,
                    detail: Some(power_state),
                }
            }
            Ok(response) => CheckResult {
                name: "System Info",
                passed: false,
                detail: Some(format!("Failed with status {}", response.status())),
            },
            Err(e) => CheckResult {
                name: "System Info",
                passed: false,
                detail: Some(e.to_string()),
            },
        }
    }

    async fn check_managers(&self) -> CheckResult {
        match self.client.get(MANAGERS_PATH).await {
            Ok(response) if response.status().as_u16() == 200 => {
                info!("Managers: Accessible");
                CheckResult {
                    name: "Managers",
                    passed: true,
                    detail: None,
                }
            }
            Ok(response) => {
                warn!("Managers: Status {}", response.status());
                CheckResult {
                    name: "Managers",
                    passed: false,
                    detail: Some(format!("Status {}", response.status())),
                }
            }
            Err(e) => {
                warn!("Managers: {}", e);
                CheckResult {
                    name: "Managers",
                    passed: false,
                    detail: Some(e.to_string()),
                }
            }
        }
    }
}
