// src/readiness/mod.rs
mod poller;

pub use poller::ReadinessPoller;
