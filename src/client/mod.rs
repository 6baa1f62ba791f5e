// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Insights API clients
//!
//! [`InsightsClient`] is the seam between callers and the deps.dev service: one
//! async method per resource type. Implementations in this crate:
//!
//! - [`HttpInsightsClient`] - talks to the deps.dev v3 REST API
//! - [`CachedInsightsClient`] - memoizes another client with single-flight caches
//! - [`LoggingClient`](crate::transport::LoggingClient) - traces another client's calls
//!
//! They compose, so the usual stack is `Cached(Logging(Http))`:
//!
//! ```rust,ignore
//! use depscache::{CachedInsightsClient, CallOptions, ClientConfig, GetRequirementsRequest, InsightsClient, System};
//!
//! let client = CachedInsightsClient::connect(ClientConfig::deps_dev())?;
//! let requirements = client
//!     .get_requirements(
//!         GetRequirementsRequest::new(System::Npm, "react", "18.2.0"),
//!         CallOptions::default(),
//!     )
//!     .await?;
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::InsightsError;
use crate::types::{
    GetPackageRequest, GetRequirementsRequest, GetVersionRequest, Package, Requirements, Version,
};

mod cached;
mod http;

pub use cached::{CachedInsightsClient, DefaultCachedClient, InsightsCacheStats};
pub use http::HttpInsightsClient;

/// Per-call options
///
/// When a call is answered by a cache, only the options of the call that
/// actually reached the service take effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Deadline for this call, overriding the client's configured timeout
    pub timeout: Option<Duration>,
}

impl CallOptions {
    /// Set a per-call timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A client for the deps.dev Insights service
///
/// Values are returned behind an `Arc` so that cached payloads are shared, not
/// copied. Cancelling a call is done by dropping its future.
#[async_trait]
pub trait InsightsClient: Send + Sync {
    /// Fetches a package and its versions
    async fn get_package(
        &self,
        request: GetPackageRequest,
        options: CallOptions,
    ) -> Result<Arc<Package>, InsightsError>;

    /// Fetches the details of one package version
    async fn get_version(
        &self,
        request: GetVersionRequest,
        options: CallOptions,
    ) -> Result<Arc<Version>, InsightsError>;

    /// Fetches the declared requirements of one package version
    async fn get_requirements(
        &self,
        request: GetRequirementsRequest,
        options: CallOptions,
    ) -> Result<Arc<Requirements>, InsightsError>;
}

#[async_trait]
impl<C> InsightsClient for Arc<C>
where
    C: InsightsClient + ?Sized,
{
    async fn get_package(
        &self,
        request: GetPackageRequest,
        options: CallOptions,
    ) -> Result<Arc<Package>, InsightsError> {
        (**self).get_package(request, options).await
    }

    async fn get_version(
        &self,
        request: GetVersionRequest,
        options: CallOptions,
    ) -> Result<Arc<Version>, InsightsError> {
        (**self).get_version(request, options).await
    }

    async fn get_requirements(
        &self,
        request: GetRequirementsRequest,
        options: CallOptions,
    ) -> Result<Arc<Requirements>, InsightsError> {
        (**self).get_requirements(request, options).await
    }
}
