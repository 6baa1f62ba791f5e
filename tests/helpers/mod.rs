// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for depscache integration tests
//!
//! Provides a mock [`InsightsClient`] so caching behavior can be tested
//! without a deps.dev server.

#![allow(dead_code)]

use async_trait::async_trait;
use depscache::{
    CallOptions, Dependency, GetPackageRequest, GetRequirementsRequest, GetVersionRequest,
    InsightsClient, InsightsError, NpmDependencies, NpmRequirements, Package, PackageVersion,
    Requirements, Version, VersionCacheKey,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Mock InsightsClient that counts the calls reaching it
///
/// Responses are synthesized from the request, so equal requests produce equal
/// (but not pointer-equal) payloads.
///
/// # Example
///
/// ```rust,ignore
/// let mock = MockInsightsClient::new().with_delay(Duration::from_millis(50));
/// let calls = mock.counters();
/// let client = CachedInsightsClient::new(mock);
/// ```
pub struct MockInsightsClient {
    counters: Arc<CallCounters>,
    delay: Option<Duration>,
    gate: Option<Arc<Notify>>,
    failure: Option<InsightsError>,
}

/// Number of calls per method
#[derive(Debug, Default)]
pub struct CallCounters {
    pub packages: AtomicUsize,
    pub versions: AtomicUsize,
    pub requirements: AtomicUsize,
}

impl CallCounters {
    pub fn packages(&self) -> usize {
        self.packages.load(Ordering::SeqCst)
    }

    pub fn versions(&self) -> usize {
        self.versions.load(Ordering::SeqCst)
    }

    pub fn requirements(&self) -> usize {
        self.requirements.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.packages() + self.versions() + self.requirements()
    }
}

impl MockInsightsClient {
    /// Create a mock that answers every request immediately
    pub fn new() -> Self {
        Self {
            counters: Arc::new(CallCounters::default()),
            delay: None,
            gate: None,
            failure: None,
        }
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Wait for a notification before answering
    ///
    /// Each `Notify::notify_one` releases one call, even if it has not reached
    /// the gate yet.
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Fail every request with `error`
    pub fn failing_with(mut self, error: InsightsError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Shared handle to the call counters
    pub fn counters(&self) -> Arc<CallCounters> {
        Arc::clone(&self.counters)
    }

    async fn respond<T>(&self, counter: &AtomicUsize, value: T) -> Result<Arc<T>, InsightsError> {
        counter.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(Arc::new(value)),
        }
    }
}

impl Default for MockInsightsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InsightsClient for MockInsightsClient {
    async fn get_package(
        &self,
        request: GetPackageRequest,
        _options: CallOptions,
    ) -> Result<Arc<Package>, InsightsError> {
        let package_key = request.package_key.unwrap_or_default();
        let versions = ["1.0.0", "2.0.0"]
            .into_iter()
            .map(|version| PackageVersion {
                version_key: depscache::VersionKey::new(
                    package_key.system,
                    package_key.name.clone(),
                    version,
                ),
                published_at: None,
                is_default: version == "2.0.0",
            })
            .collect();
        self.respond(
            &self.counters.packages,
            Package {
                package_key,
                versions,
            },
        )
        .await
    }

    async fn get_version(
        &self,
        request: GetVersionRequest,
        _options: CallOptions,
    ) -> Result<Arc<Version>, InsightsError> {
        let version = Version {
            version_key: request.version_key.unwrap_or_default(),
            ..Default::default()
        };
        self.respond(&self.counters.versions, version).await
    }

    async fn get_requirements(
        &self,
        request: GetRequirementsRequest,
        _options: CallOptions,
    ) -> Result<Arc<Requirements>, InsightsError> {
        let key = VersionCacheKey::from(&request);
        let requirements = Requirements {
            npm: Some(NpmRequirements {
                dependencies: NpmDependencies {
                    dependencies: vec![Dependency {
                        name: format!("{}-dep", key.name),
                        requirement: "^1.0.0".to_string(),
                    }],
                    ..Default::default()
                },
                ..Default::default()
            }),
            ..Default::default()
        };
        self.respond(&self.counters.requirements, requirements)
            .await
    }
}

/// Deserializable package document in the deps.dev v3 shape
pub fn package_json(system: &str, name: &str) -> String {
    serde_json::json!({
        "packageKey": { "system": system, "name": name },
        "versions": [
            {
                "versionKey": { "system": system, "name": name, "version": "17.0.2" },
                "publishedAt": "2021-03-22T21:56:19Z",
                "isDefault": false
            },
            {
                "versionKey": { "system": system, "name": name, "version": "18.2.0" },
                "publishedAt": "2022-06-14T19:46:38Z",
                "isDefault": true
            }
        ]
    })
    .to_string()
}
