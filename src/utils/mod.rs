//! Configuration and process-level utilities.

/// Environment-sourced application configuration.
pub mod config;
/// Tracing subscriber setup.
pub mod logging;
