// src/main.rs
use anyhow::Result;
use clap::Parser;
use tracing::info;

mod apitest;
mod client;
mod config;
mod health;
mod readiness;
mod runner;

use crate::{
    config::BmcConfig,
    runner::{Selection, TestRunner},
};

/// OpenBMC CI test runner
#[derive(Parser, Debug)]
#[command(name = "bmc-ci-runner", version, about)]
struct Args {
    /// Run basic connection tests
    #[arg(long)]
    basic: bool,

    /// Run API tests
    #[arg(long)]
    api: bool,

    /// Run all tests
    #[arg(long)]
    all: bool,
}

impl Args {
    fn selection(&self) -> Selection {
        if self.all || (!self.basic && !self.api) {
            Selection::all()
        } else {
            Selection {
                basic: self.basic,
                api: self.api,
            }
        }
    }
}

// The whole run is strictly sequential; a single-threaded runtime matches.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bmc_ci_runner=info")),
        )
        .init();

    let config = BmcConfig::from_env()?;
    info!("BMC URL: {}", config.base_url);

    let mut runner = TestRunner::new(config)?;
    let success = runner.run(args.selection()).await?;

    std::process::exit(if success { 0 } else { 1 });
}
