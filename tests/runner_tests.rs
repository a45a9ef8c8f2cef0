// tests/runner_tests.rs
//
// End-to-end aggregator behavior against a mock BMC. The delegated pytest
// step is stubbed with a shell one-liner so no Python is needed.

use std::time::Duration;

use bmc_ci_runner::apitest::ApiTestRunner;
use bmc_ci_runner::client::RedfishClient;
use bmc_ci_runner::config::{ApiTestConfig, BmcConfig, PollerConfig};
use bmc_ci_runner::health::HealthChecker;
use bmc_ci_runner::readiness::ReadinessPoller;
use bmc_ci_runner::runner::{Selection, TestRunner};
use url::Url;

fn client_for(url: &str) -> RedfishClient {
    let config = BmcConfig {
        base_url: Url::parse(url).unwrap(),
        username: "root".to_string(),
        password: "0penBmc".to_string(),
    };
    RedfishClient::new(config, Duration::from_secs(2)).unwrap()
}

fn runner_for(url: &str, pytest_script: &str) -> TestRunner {
    let client = client_for(url);
    let poller = ReadinessPoller::new(
        PollerConfig {
            max_attempts: 2,
            interval_secs: 0,
            request_timeout_secs: 2,
        },
        client.clone(),
    );
    let health = HealthChecker::new(client);
    let apitest = ApiTestRunner::new(ApiTestConfig { timeout_secs: 10 }).with_command(vec![
        "sh".to_string(),
        "-c".to_string(),
        pytest_script.to_string(),
    ]);
    TestRunner::with_parts(poller, health, apitest)
}

async fn mock_healthy_bmc(server: &mut mockito::Server) {
    server
        .mock("GET", "/redfish/v1/")
        .with_status(200)
        .create_async()
        .await;
    server
        .mock("GET", "/redfish/v1/Systems/system")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"PowerState":"On"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/redfish/v1/Managers")
        .with_status(200)
        .create_async()
        .await;
}

#[tokio::test]
async fn test_unreachable_bmc_fails_without_recording_suites() {
    let mut runner = runner_for("http://127.0.0.1:1", "exit 0");
    let success = runner.run(Selection::all()).await.unwrap();

    assert!(!success);
    assert!(runner.outcomes().is_empty());
}

#[tokio::test]
async fn test_full_run_passes_when_everything_is_green() {
    let mut server = mockito::Server::new_async().await;
    mock_healthy_bmc(&mut server).await;

    let mut runner = runner_for(&server.url(), "exit 0");
    let success = runner.run(Selection::all()).await.unwrap();

    assert!(success);
    let outcomes = runner.outcomes();
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.passed));
    assert!(std::path::Path::new("test-results").is_dir());
}

#[tokio::test]
async fn test_degraded_managers_still_passes_basic_suite() {
    // Root and system answer 200, managers answers 503: 2/3 is a pass for
    // the basic suite, so the overall verdict rides on the API suite.
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/redfish/v1/")
        .with_status(200)
        .create_async()
        .await;
    server
        .mock("GET", "/redfish/v1/Systems/system")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"PowerState":"On"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/redfish/v1/Managers")
        .with_status(503)
        .create_async()
        .await;

    let mut runner = runner_for(&server.url(), "exit 0");
    assert!(runner.run(Selection::all()).await.unwrap());

    let mut runner = runner_for(&server.url(), "exit 1");
    assert!(!runner.run(Selection::all()).await.unwrap());
}

#[tokio::test]
async fn test_failed_api_suite_does_not_hide_basic_outcome() {
    let mut server = mockito::Server::new_async().await;
    mock_healthy_bmc(&mut server).await;

    let mut runner = runner_for(&server.url(), "exit 1");
    let success = runner.run(Selection::all()).await.unwrap();

    assert!(!success);
    let outcomes = runner.outcomes();
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].passed, "basic suite should still be recorded as passed");
    assert!(!outcomes[1].passed);
}

#[tokio::test]
async fn test_basic_only_selection_runs_one_suite() {
    let mut server = mockito::Server::new_async().await;
    mock_healthy_bmc(&mut server).await;

    let mut runner = runner_for(&server.url(), "exit 1");
    let success = runner
        .run(Selection {
            basic: true,
            api: false,
        })
        .await
        .unwrap();

    // The failing pytest stub is never invoked.
    assert!(success);
    assert_eq!(runner.outcomes().len(), 1);
    assert_eq!(runner.outcomes()[0].name, "Basic Connection");
}
