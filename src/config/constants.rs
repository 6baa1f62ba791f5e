//! Endpoint defaults and environment variable names
//!
//! This module centralizes the constants used to build clients, improving
//! discoverability when overriding them.

use std::time::Duration;

/// Public deps.dev API endpoint
pub const DEPS_DEV_BASE_URL: &str = "https://api.deps.dev";

/// User agent sent when none is configured explicitly
pub const DEFAULT_USER_AGENT: &str = concat!("depscache/", env!("CARGO_PKG_VERSION"));

/// Whole-request timeout for the public endpoint
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// TCP/TLS connect timeout for the public endpoint
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variables read by [`ClientConfig::from_env`](super::ClientConfig::from_env)
pub mod env {
    /// Overrides the API base URL
    pub const BASE_URL: &str = "DEPSDEV_BASE_URL";
    /// Overrides the user agent; an empty value disables the header
    pub const USER_AGENT: &str = "DEPSDEV_USER_AGENT";
    /// Request timeout in whole seconds
    pub const TIMEOUT_SECS: &str = "DEPSDEV_TIMEOUT_SECS";
}
