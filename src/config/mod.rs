// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for Insights clients
//!
//! # Example: Public endpoint
//!
//! ```rust
//! use depscache::ClientConfig;
//!
//! let config = ClientConfig::deps_dev();
//! assert_eq!(config.base_url, "https://api.deps.dev");
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use depscache::ClientConfig;
//! use std::time::Duration;
//!
//! let config = ClientConfig::new("https://insights.internal.example")
//!     .with_user_agent("scanner/2.1")
//!     .with_timeout(Duration::from_secs(5));
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use url::Url;

use crate::errors::InsightsError;

pub mod constants;

/// Configuration for creating an [`HttpInsightsClient`](crate::HttpInsightsClient)
///
/// Establishing the transport is configuration-time setup: everything here is
/// consumed when the client is built, and any error it causes is a setup error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL (scheme, host and optional path prefix)
    pub base_url: String,
    /// Value of the `User-Agent` header (None or empty to omit it)
    pub user_agent: Option<String>,
    /// Whole-request timeout duration
    pub timeout: Option<Duration>,
    /// Connection establishment timeout
    pub connect_timeout: Option<Duration>,
    /// Whether to trace request and response payloads (can be verbose)
    pub log_payloads: bool,
}

impl ClientConfig {
    /// Create a new configuration for the given base URL, with no timeouts
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: None,
            timeout: None,
            connect_timeout: None,
            log_payloads: false,
        }
    }

    /// Set the user agent
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Omit the `User-Agent` header
    #[must_use]
    pub fn without_user_agent(mut self) -> Self {
        self.user_agent = None;
        self
    }

    /// Set request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set connect timeout
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Trace full request and response payloads
    #[must_use]
    pub fn with_payload_logging(mut self) -> Self {
        self.log_payloads = true;
        self
    }

    /// The user agent to send, if any
    pub fn effective_user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref().filter(|agent| !agent.is_empty())
    }

    /// Parse and check the base URL
    ///
    /// # Errors
    ///
    /// Returns [`InsightsError::InvalidConfig`] if the URL does not parse, is
    /// not http(s), or cannot carry a path.
    pub fn validate(&self) -> Result<Url, InsightsError> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            InsightsError::invalid_config(format!("invalid base URL {:?}: {e}", self.base_url))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(InsightsError::invalid_config(format!(
                "base URL {:?} must use http or https",
                self.base_url
            )));
        }
        if url.cannot_be_a_base() {
            return Err(InsightsError::invalid_config(format!(
                "base URL {:?} cannot carry a path",
                self.base_url
            )));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(InsightsError::invalid_config(format!(
                "base URL {:?} must not have a query or fragment",
                self.base_url
            )));
        }

        Ok(url)
    }

    /// Load configuration from the environment
    ///
    /// Starts from [`ClientConfig::deps_dev`] and applies the variables listed
    /// in [`constants::env`]. Variables are read through `dotenvy`, so values
    /// from an already loaded `.env` file are honoured.
    ///
    /// # Errors
    ///
    /// Returns [`InsightsError::InvalidConfig`] if a variable holds an
    /// unparseable value.
    pub fn from_env() -> Result<Self, InsightsError> {
        Self::from_lookup(|name| dotenvy::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, InsightsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::deps_dev();

        if let Some(base_url) = lookup(constants::env::BASE_URL) {
            config.base_url = base_url.trim().to_string();
        }
        if let Some(user_agent) = lookup(constants::env::USER_AGENT) {
            config.user_agent = Some(user_agent.trim().to_string());
        }
        if let Some(timeout) = lookup(constants::env::TIMEOUT_SECS) {
            let seconds = timeout.trim().parse::<u64>().map_err(|_| {
                InsightsError::invalid_config(format!(
                    "{} must be a whole number of seconds, got {timeout:?}",
                    constants::env::TIMEOUT_SECS
                ))
            })?;
            config.timeout = Some(Duration::from_secs(seconds));
        }

        Ok(config)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::deps_dev()
    }
}

/// Preset configurations
impl ClientConfig {
    /// Configuration preset for the public deps.dev API
    #[must_use]
    pub fn deps_dev() -> Self {
        Self::new(constants::DEPS_DEV_BASE_URL)
            .with_user_agent(constants::DEFAULT_USER_AGENT)
            .with_timeout(constants::DEFAULT_TIMEOUT)
            .with_connect_timeout(constants::DEFAULT_CONNECT_TIMEOUT)
    }

    /// Configuration preset for a local mirror or test server
    #[must_use]
    pub fn local(base_url: impl Into<String>) -> Self {
        Self::new(base_url)
            .with_user_agent(constants::DEFAULT_USER_AGENT)
            .with_timeout(Duration::from_secs(5))
    }
}
