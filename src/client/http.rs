// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client for the deps.dev v3 REST API

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, Instrument, Span};
use url::Url;

use super::{CallOptions, InsightsClient};
use crate::config::ClientConfig;
use crate::errors::InsightsError;
use crate::keys::{PackageCacheKey, VersionCacheKey};
use crate::spans;
use crate::types::{
    GetPackageRequest, GetRequirementsRequest, GetVersionRequest, Package, PackageKey,
    Requirements, Version, VersionKey,
};

/// Insights client speaking the deps.dev v3 REST API
///
/// TLS uses rustls with the operating system's trust store. The client holds a
/// pooled `reqwest::Client`, so one instance should be shared across tasks.
///
/// # Example
///
/// ```rust,ignore
/// use depscache::{ClientConfig, HttpInsightsClient};
///
/// let client = HttpInsightsClient::new(&ClientConfig::deps_dev())?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpInsightsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpInsightsClient {
    /// Build a client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`InsightsError::InvalidConfig`] for a bad base URL and
    /// [`InsightsError::Setup`] if the TLS/HTTP stack cannot be initialized.
    pub fn new(config: &ClientConfig) -> Result<Self, InsightsError> {
        let base_url = config.validate()?;

        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(user_agent) = config.effective_user_agent() {
            builder = builder.user_agent(user_agent.to_string());
        }

        let http = builder
            .build()
            .map_err(|e| InsightsError::setup("building HTTP client", e))?;

        info!(base_url = %base_url, "Created deps.dev insights client");
        Ok(Self { http, base_url })
    }

    /// The API base URL requests are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/v3/systems/{system}/packages/{name}`
    pub(crate) fn package_url(&self, key: &PackageKey) -> Result<Url, InsightsError> {
        let resource = PackageCacheKey::from(key).to_string();
        check_identifier(&resource, key.system.is_specified(), &[&key.name])?;
        self.endpoint(
            &resource,
            &["v3", "systems", key.system.as_path_segment(), "packages", &key.name],
        )
    }

    /// `{base}/v3/systems/{system}/packages/{name}/versions/{version}{suffix}`
    pub(crate) fn version_url(&self, key: &VersionKey, suffix: &str) -> Result<Url, InsightsError> {
        let resource = VersionCacheKey::from(key).to_string();
        check_identifier(
            &resource,
            key.system.is_specified(),
            &[&key.name, &key.version],
        )?;
        let version = format!("{}{suffix}", key.version);
        self.endpoint(
            &resource,
            &[
                "v3",
                "systems",
                key.system.as_path_segment(),
                "packages",
                &key.name,
                "versions",
                &version,
            ],
        )
    }

    /// Appends percent-encoded segments to the base URL
    fn endpoint(&self, resource: &str, segments: &[&str]) -> Result<Url, InsightsError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                InsightsError::invalid_request(resource, "base URL cannot carry a path")
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Performs a GET and decodes the JSON body
    async fn fetch<T>(
        &self,
        resource: String,
        url: Url,
        options: CallOptions,
    ) -> Result<T, InsightsError>
    where
        T: DeserializeOwned,
    {
        let span = spans::http_request(&url);
        async move {
            let mut request = self.http.get(url);
            if let Some(timeout) = options.timeout {
                request = request.timeout(timeout);
            }

            let response = request
                .send()
                .await
                .map_err(|e| map_reqwest_error(&resource, e))?;

            let status = response.status();
            Span::current().record("status", status.as_u16());

            if status == StatusCode::NOT_FOUND {
                return Err(InsightsError::NotFound { resource });
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = match body.trim() {
                    "" => status
                        .canonical_reason()
                        .unwrap_or("unknown status")
                        .to_string(),
                    body => body.to_string(),
                };
                debug!(status = status.as_u16(), "Insights request rejected");
                return Err(InsightsError::Status {
                    status: status.as_u16(),
                    resource,
                    message,
                });
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| map_reqwest_error(&resource, e))?;
            serde_json::from_slice(&body).map_err(|e| InsightsError::decode(resource, e))
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl InsightsClient for HttpInsightsClient {
    async fn get_package(
        &self,
        request: GetPackageRequest,
        options: CallOptions,
    ) -> Result<Arc<Package>, InsightsError> {
        let key = request.package_key.unwrap_or_default();
        let url = self.package_url(&key)?;
        let resource = PackageCacheKey::from(&key).to_string();
        self.fetch(resource, url, options).await.map(Arc::new)
    }

    async fn get_version(
        &self,
        request: GetVersionRequest,
        options: CallOptions,
    ) -> Result<Arc<Version>, InsightsError> {
        let key = request.version_key.unwrap_or_default();
        let url = self.version_url(&key, "")?;
        let resource = VersionCacheKey::from(&key).to_string();
        self.fetch(resource, url, options).await.map(Arc::new)
    }

    async fn get_requirements(
        &self,
        request: GetRequirementsRequest,
        options: CallOptions,
    ) -> Result<Arc<Requirements>, InsightsError> {
        let key = request.version_key.unwrap_or_default();
        let url = self.version_url(&key, ":requirements")?;
        let resource = format!("{}:requirements", VersionCacheKey::from(&key));
        self.fetch(resource, url, options).await.map(Arc::new)
    }
}

/// Rejects identifiers the service could never resolve
fn check_identifier(
    resource: &str,
    system_specified: bool,
    fields: &[&str],
) -> Result<(), InsightsError> {
    if !system_specified {
        return Err(InsightsError::invalid_request(
            resource,
            "package system is unspecified",
        ));
    }
    if fields.iter().any(|field| field.is_empty()) {
        return Err(InsightsError::invalid_request(
            resource,
            "package name and version must not be empty",
        ));
    }
    // URL path editing drops dot segments, which would address another resource
    if fields.iter().any(|field| matches!(*field, "." | "..")) {
        return Err(InsightsError::invalid_request(
            resource,
            "package name and version must not be `.` or `..`",
        ));
    }
    Ok(())
}

fn map_reqwest_error(resource: &str, error: reqwest::Error) -> InsightsError {
    if error.is_timeout() {
        InsightsError::Timeout {
            resource: resource.to_string(),
        }
    } else {
        InsightsError::transport(resource, error)
    }
}
