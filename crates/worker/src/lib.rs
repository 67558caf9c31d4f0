//! `quotas-worker` library crate.
//!
//! Plugin registry, the two quota jobs and the interval scheduler that
//! drives them. The binary entrypoint lives in `main.rs`.

pub mod config;
pub mod jobs;
pub mod plugins;
pub mod scheduler;
