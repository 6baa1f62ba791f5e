// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower-based logging layer for Insights clients.
//!
//! This module implements a logging layer that uses `tracing` to record
//! Insights request/response information for debugging and observability.

use std::{fmt, future::Future, sync::Arc, time::Instant};

use async_trait::async_trait;
use tower::Layer;
use tracing::{debug, trace, warn, Instrument, Span};

use crate::client::{CallOptions, InsightsClient};
use crate::errors::InsightsError;
use crate::keys::{PackageCacheKey, VersionCacheKey};
use crate::spans;
use crate::types::{
    GetPackageRequest, GetRequirementsRequest, GetVersionRequest, Package, Requirements, Version,
};

/// A Tower layer that adds logging/tracing to Insights calls.
///
/// This layer wraps each call in a tracing span and logs timing
/// information, request details, and any errors that occur.
///
/// # Example
///
/// ```rust,ignore
/// use depscache::{ClientConfig, HttpInsightsClient, LoggingLayer};
/// use tower::Layer;
///
/// let transport = HttpInsightsClient::new(&ClientConfig::deps_dev())?;
/// let client = LoggingLayer::new().layer(transport);
/// ```
#[derive(Clone, Debug, Default)]
pub struct LoggingLayer {
    /// Whether to log request payloads
    log_requests: bool,
    /// Whether to log response payloads (can be verbose)
    log_responses: bool,
}

impl LoggingLayer {
    /// Creates a new logging layer with default settings.
    ///
    /// By default, only timing and errors are logged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables logging of request payloads.
    pub fn with_request_logging(mut self) -> Self {
        self.log_requests = true;
        self
    }

    /// Enables logging of response payloads.
    ///
    /// Warning: package and requirements documents can be large.
    pub fn with_response_logging(mut self) -> Self {
        self.log_responses = true;
        self
    }

    /// Enables logging of both request and response payloads.
    pub fn verbose(mut self) -> Self {
        self.log_requests = true;
        self.log_responses = true;
        self
    }
}

impl<C> Layer<C> for LoggingLayer {
    type Service = LoggingClient<C>;

    fn layer(&self, client: C) -> Self::Service {
        LoggingClient {
            client,
            log_requests: self.log_requests,
            log_responses: self.log_responses,
        }
    }
}

/// An Insights client that logs the calls made through it.
#[derive(Clone, Debug)]
pub struct LoggingClient<C> {
    client: C,
    log_requests: bool,
    log_responses: bool,
}

impl<C> LoggingClient<C> {
    /// The wrapped client
    pub fn inner(&self) -> &C {
        &self.client
    }

    async fn logged<Req, T, Fut>(
        &self,
        method: &'static str,
        key: &(impl fmt::Display + Sync),
        request: &Req,
        call: Fut,
    ) -> Result<Arc<T>, InsightsError>
    where
        Req: fmt::Debug + Sync,
        T: fmt::Debug + Send + Sync,
        Fut: Future<Output = Result<Arc<T>, InsightsError>> + Send,
    {
        let span = spans::insights_call(method, key);
        async move {
            let start = Instant::now();

            if self.log_requests {
                trace!(request = ?request, "Insights request");
            } else {
                debug!("Insights request: {method}");
            }

            let result = call.await;
            let duration = start.elapsed();

            Span::current().record("duration_ms", duration.as_millis() as u64);

            match &result {
                Ok(response) => {
                    if self.log_responses {
                        trace!(
                            response = ?response,
                            duration_ms = %duration.as_millis(),
                            "Insights response"
                        );
                    } else {
                        debug!(
                            duration_ms = %duration.as_millis(),
                            "Insights response: {method}"
                        );
                    }
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        duration_ms = %duration.as_millis(),
                        "Insights error: {method}"
                    );
                }
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl<C> InsightsClient for LoggingClient<C>
where
    C: InsightsClient,
{
    async fn get_package(
        &self,
        request: GetPackageRequest,
        options: CallOptions,
    ) -> Result<Arc<Package>, InsightsError> {
        let key = PackageCacheKey::from(&request);
        let logged_request = request.clone();
        self.logged(
            "GetPackage",
            &key,
            &logged_request,
            self.client.get_package(request, options),
        )
        .await
    }

    async fn get_version(
        &self,
        request: GetVersionRequest,
        options: CallOptions,
    ) -> Result<Arc<Version>, InsightsError> {
        let key = VersionCacheKey::from(&request);
        let logged_request = request.clone();
        self.logged(
            "GetVersion",
            &key,
            &logged_request,
            self.client.get_version(request, options),
        )
        .await
    }

    async fn get_requirements(
        &self,
        request: GetRequirementsRequest,
        options: CallOptions,
    ) -> Result<Arc<Requirements>, InsightsError> {
        let key = VersionCacheKey::from(&request);
        let logged_request = request.clone();
        self.logged(
            "GetRequirements",
            &key,
            &logged_request,
            self.client.get_requirements(request, options),
        )
        .await
    }
}
