// src/client/mod.rs

use crate::config::BmcConfig;
use anyhow::{Context, Result};
use reqwest::{Client, Response};
use std::time::Duration;

/// Authenticated HTTP client for one BMC endpoint.
///
/// Every request carries basic auth and a per-request timeout. Certificate
/// validation is disabled because OpenBMC ships with a self-signed cert.
#[derive(Debug, Clone)]
pub struct RedfishClient {
    config: BmcConfig,
    client: Client,
}

impl RedfishClient {
    pub fn new(config: BmcConfig, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { config, client })
    }

    /// GET a resource path relative to the configured base URL.
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = self.config.base_url.join(path)?;
        let response = self
            .client
            .get(url.as_str())
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .await?;
        Ok(response)
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url.as_str()
    }
}
