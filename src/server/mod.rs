//! External inference server management
//!
//! Launching the SGLang child process and waiting for it to come up.

pub mod health;
pub mod launcher;

pub use health::{wait_for_ready, HealthError};
pub use launcher::{check_sglang_installed, spawn, LaunchPlan, ServerError, ServerHandle};
