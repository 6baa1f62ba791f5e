// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the depscache library.
//!
//! [`InsightsError`] covers two kinds of failure:
//!
//! - **Setup errors** ([`InsightsError::Setup`], [`InsightsError::InvalidConfig`])
//!   happen while building a client. They are returned immediately and never
//!   cached.
//! - **Request errors** (everything else) are the outcome of one lookup. The
//!   caching client memoizes them per key alongside successes, so every current
//!   and later caller for that key receives the same error.
//!
//! Because a single outcome is handed to many callers, `InsightsError` is
//! `Clone`; underlying sources are kept behind an `Arc`.
//!
//! # Examples
//!
//! ```rust,ignore
//! use depscache::{CachedInsightsClient, CallOptions, GetPackageRequest, InsightsError, System};
//!
//! match client.get_package(GetPackageRequest::new(System::Npm, "left-pad"), CallOptions::default()).await {
//!     Ok(package) => println!("{} versions", package.versions.len()),
//!     Err(InsightsError::NotFound { resource }) => eprintln!("no such package: {resource}"),
//!     Err(e) => eprintln!("lookup failed: {e}"),
//! }
//! ```

use std::error::Error as StdError;
use std::sync::Arc;

use crate::cache::ProducerPanic;

/// Shared, cloneable error source
pub type SharedSource = Arc<dyn StdError + Send + Sync>;

/// Errors returned by Insights clients
#[derive(Debug, Clone, thiserror::Error)]
pub enum InsightsError {
    /// Failed to build the transport (TLS setup, HTTP client construction).
    #[error("Failed to set up insights client: {details}")]
    Setup {
        /// What was being set up
        details: String,
        /// The underlying error
        #[source]
        source: SharedSource,
    },

    /// The client configuration is invalid.
    #[error("Invalid client configuration: {details}")]
    InvalidConfig {
        /// Why the configuration was rejected
        details: String,
    },

    /// A system name did not match any known ecosystem.
    #[error("Unknown package system: {value:?}")]
    UnknownSystem {
        /// The rejected input
        value: String,
    },

    /// The request cannot be sent (e.g. missing identifier or empty name).
    #[error("Invalid request for {resource}: {details}")]
    InvalidRequest {
        /// The resource the request addressed
        resource: String,
        /// Why the request was rejected
        details: String,
    },

    /// The requested package or version does not exist.
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that wasn't found
        resource: String,
    },

    /// The service answered with a non-success status.
    #[error("Request for {resource} failed with status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// The resource that was requested
        resource: String,
        /// Response body or status reason
        message: String,
    },

    /// The request did not complete within its deadline.
    #[error("Request for {resource} timed out")]
    Timeout {
        /// The resource that was requested
        resource: String,
    },

    /// Connection or protocol failure while talking to the service.
    #[error("Transport failure while requesting {resource}")]
    Transport {
        /// The resource that was requested
        resource: String,
        /// The underlying error
        #[source]
        source: SharedSource,
    },

    /// The response body could not be decoded.
    #[error("Failed to decode response for {resource}")]
    Decode {
        /// The resource that was requested
        resource: String,
        /// The underlying error
        #[source]
        source: SharedSource,
    },

    /// The code producing a cached value panicked.
    #[error("Producer panicked: {message}")]
    ProducerPanicked {
        /// The panic message
        message: String,
    },
}

impl InsightsError {
    /// Helper to create a `Setup` error from any error type.
    pub fn setup(
        details: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        InsightsError::Setup {
            details: details.into(),
            source: Arc::new(source),
        }
    }

    /// Helper to create an `InvalidConfig` error.
    pub fn invalid_config(details: impl Into<String>) -> Self {
        InsightsError::InvalidConfig {
            details: details.into(),
        }
    }

    /// Helper to create an `InvalidRequest` error.
    pub fn invalid_request(resource: impl Into<String>, details: impl Into<String>) -> Self {
        InsightsError::InvalidRequest {
            resource: resource.into(),
            details: details.into(),
        }
    }

    /// Helper to create a `Transport` error from any error type.
    pub fn transport(
        resource: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        InsightsError::Transport {
            resource: resource.into(),
            source: Arc::new(source),
        }
    }

    /// Helper to create a `Decode` error from any error type.
    pub fn decode(
        resource: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        InsightsError::Decode {
            resource: resource.into(),
            source: Arc::new(source),
        }
    }

    /// Whether the resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, InsightsError::NotFound { .. })
    }

    /// Whether the request ran out of time
    pub fn is_timeout(&self) -> bool {
        matches!(self, InsightsError::Timeout { .. })
    }

    /// Whether this error happened while building a client rather than during a request
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            InsightsError::Setup { .. } | InsightsError::InvalidConfig { .. }
        )
    }
}

impl From<ProducerPanic> for InsightsError {
    fn from(panic: ProducerPanic) -> Self {
        InsightsError::ProducerPanicked {
            message: panic.message().to_string(),
        }
    }
}
