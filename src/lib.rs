// src/lib.rs
pub mod apitest;
pub mod client;
pub mod config;
pub mod health;
pub mod readiness;
pub mod runner;
