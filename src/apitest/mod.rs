// src/apitest/mod.rs
mod runner;

pub use runner::{ApiTestError, ApiTestRunner};
