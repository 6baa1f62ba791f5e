// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Caching wrapper around any [`InsightsClient`]

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tower::Layer;
use tracing::Instrument;

use super::{CallOptions, HttpInsightsClient, InsightsClient};
use crate::cache::{CacheStats, RequestCache};
use crate::config::ClientConfig;
use crate::errors::InsightsError;
use crate::keys::{PackageCacheKey, VersionCacheKey};
use crate::spans;
use crate::transport::{LoggingClient, LoggingLayer};
use crate::types::{
    GetPackageRequest, GetRequirementsRequest, GetVersionRequest, Package, Requirements, Version,
};

/// An [`InsightsClient`] that deduplicates requests for the lifetime of the process
///
/// Each resource type has its own [`RequestCache`]. The first request for a key
/// is forwarded to the wrapped client; every concurrent or later request for the
/// same key shares that one outcome, including failures. Nothing is evicted, so
/// this suits a scan or session with a bounded set of packages, not a
/// long-running service that needs fresh data.
///
/// A [`CallOptions::timeout`] bounds the forwarded call of the caller that
/// created the entry. Callers that join an entry already in flight wait for it
/// regardless of their own options.
///
/// # Example
///
/// ```rust,ignore
/// use depscache::{CachedInsightsClient, CallOptions, ClientConfig, GetPackageRequest, InsightsClient, System};
///
/// let client = CachedInsightsClient::connect(ClientConfig::deps_dev())?;
/// let request = GetPackageRequest::new(System::Cargo, "serde");
///
/// // Second call is answered from the cache
/// let first = client.get_package(request.clone(), CallOptions::default()).await?;
/// let second = client.get_package(request, CallOptions::default()).await?;
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// ```
pub struct CachedInsightsClient<C> {
    inner: Arc<C>,
    packages: RequestCache<PackageCacheKey, Arc<Package>, InsightsError>,
    versions: RequestCache<VersionCacheKey, Arc<Version>, InsightsError>,
    requirements: RequestCache<VersionCacheKey, Arc<Requirements>, InsightsError>,
}

/// The client built by [`CachedInsightsClient::connect`]
pub type DefaultCachedClient = CachedInsightsClient<LoggingClient<HttpInsightsClient>>;

impl DefaultCachedClient {
    /// Build the standard stack: HTTP transport, call logging, then caching
    ///
    /// # Errors
    ///
    /// Transport setup errors are returned immediately and are never cached.
    pub fn connect(config: ClientConfig) -> Result<Self, InsightsError> {
        let transport = HttpInsightsClient::new(&config)?;
        let logging = if config.log_payloads {
            LoggingLayer::new().verbose()
        } else {
            LoggingLayer::new()
        };
        Ok(Self::new(logging.layer(transport)))
    }
}

impl<C> CachedInsightsClient<C>
where
    C: InsightsClient + 'static,
{
    /// Wrap `inner` with empty caches
    pub fn new(inner: C) -> Self {
        Self {
            inner: Arc::new(inner),
            packages: RequestCache::new(),
            versions: RequestCache::new(),
            requirements: RequestCache::new(),
        }
    }

    /// The wrapped client
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Returns current statistics of all three caches
    pub fn cache_stats(&self) -> InsightsCacheStats {
        InsightsCacheStats {
            packages: self.packages.stats(),
            versions: self.versions.stats(),
            requirements: self.requirements.stats(),
        }
    }
}

impl<C> fmt::Debug for CachedInsightsClient<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedInsightsClient")
            .field("packages", &self.packages)
            .field("versions", &self.versions)
            .field("requirements", &self.requirements)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<C> InsightsClient for CachedInsightsClient<C>
where
    C: InsightsClient + 'static,
{
    async fn get_package(
        &self,
        request: GetPackageRequest,
        options: CallOptions,
    ) -> Result<Arc<Package>, InsightsError> {
        let key = PackageCacheKey::from(&request);
        let span = spans::cached_lookup("packages", &key);
        let resource = key.to_string();
        let inner = Arc::clone(&self.inner);
        self.packages
            .get(key, move || async move {
                within_deadline(options, resource, inner.get_package(request, options)).await
            })
            .instrument(span)
            .await
    }

    async fn get_version(
        &self,
        request: GetVersionRequest,
        options: CallOptions,
    ) -> Result<Arc<Version>, InsightsError> {
        let key = VersionCacheKey::from(&request);
        let span = spans::cached_lookup("versions", &key);
        let resource = key.to_string();
        let inner = Arc::clone(&self.inner);
        self.versions
            .get(key, move || async move {
                within_deadline(options, resource, inner.get_version(request, options)).await
            })
            .instrument(span)
            .await
    }

    async fn get_requirements(
        &self,
        request: GetRequirementsRequest,
        options: CallOptions,
    ) -> Result<Arc<Requirements>, InsightsError> {
        let key = VersionCacheKey::from(&request);
        let span = spans::cached_lookup("requirements", &key);
        let resource = key.to_string();
        let inner = Arc::clone(&self.inner);
        self.requirements
            .get(key, move || async move {
                within_deadline(options, resource, inner.get_requirements(request, options)).await
            })
            .instrument(span)
            .await
    }
}

/// Bounds a forwarded call by the caller's timeout, if any
///
/// The outcome, including a timeout, is what the cache stores for the key.
async fn within_deadline<T, F>(
    options: CallOptions,
    resource: String,
    call: F,
) -> Result<T, InsightsError>
where
    F: Future<Output = Result<T, InsightsError>>,
{
    match options.timeout {
        Some(timeout) => tokio::time::timeout(timeout, call)
            .await
            .map_err(|_| InsightsError::Timeout { resource })?,
        None => call.await,
    }
}

/// Statistics for the three caches of a [`CachedInsightsClient`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InsightsCacheStats {
    pub packages: CacheStats,
    pub versions: CacheStats,
    pub requirements: CacheStats,
}

impl InsightsCacheStats {
    /// Number of calls forwarded to the wrapped client, across all caches
    pub fn forwarded(&self) -> u64 {
        self.packages.misses + self.versions.misses + self.requirements.misses
    }
}

impl fmt::Display for InsightsCacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "packages: {}; versions: {}; requirements: {}",
            self.packages, self.versions, self.requirements
        )
    }
}
