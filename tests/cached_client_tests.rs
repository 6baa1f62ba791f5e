// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for CachedInsightsClient
//!
//! These tests validate deduplication and outcome sharing through the public
//! API, using a counting mock in place of the deps.dev service.

mod helpers;

use depscache::{
    CachedInsightsClient, CallOptions, GetPackageRequest, GetRequirementsRequest,
    GetVersionRequest, InsightsClient, InsightsError, PackageKey, System, VersionKey,
};
use helpers::MockInsightsClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Wait until `count` lookups have reached the cache
async fn wait_for_lookups<C: InsightsClient + 'static>(
    client: &CachedInsightsClient<C>,
    count: u64,
) {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let stats = client.cache_stats();
            let lookups = stats.packages.hits
                + stats.packages.misses
                + stats.versions.hits
                + stats.versions.misses
                + stats.requirements.hits
                + stats.requirements.misses;
            if lookups >= count {
                break;
            }
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("lookups did not arrive in time");
}

/// Test that concurrent requests for one package reach the service once
#[tokio::test]
async fn test_concurrent_package_requests_are_deduplicated() {
    let gate = Arc::new(Notify::new());
    let mock = MockInsightsClient::new().with_gate(Arc::clone(&gate));
    let calls = mock.counters();
    let client = Arc::new(CachedInsightsClient::new(mock));

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let client = Arc::clone(&client);
            tokio::spawn(async move {
                client
                    .get_package(
                        GetPackageRequest::new(System::Npm, "react"),
                        CallOptions::default(),
                    )
                    .await
            })
        })
        .collect();

    // Hold the producer until every caller has joined the entry
    wait_for_lookups(&client, 32).await;
    gate.notify_one();

    let mut packages = Vec::new();
    for handle in handles {
        packages.push(handle.await.unwrap().unwrap());
    }

    assert_eq!(calls.packages(), 1, "only one request should reach the service");
    assert!(
        packages.iter().all(|p| Arc::ptr_eq(p, &packages[0])),
        "every caller should share the same payload"
    );

    let stats = client.cache_stats();
    assert_eq!(stats.packages.misses, 1);
    assert_eq!(stats.packages.hits, 31);
    assert_eq!(stats.packages.in_flight, 0);
}

/// Test that a later request is answered from the cache
#[tokio::test]
async fn test_settled_package_is_reused() {
    let mock = MockInsightsClient::new();
    let calls = mock.counters();
    let client = CachedInsightsClient::new(mock);

    let request = GetPackageRequest::new(System::Cargo, "serde");
    let first = client
        .get_package(request.clone(), CallOptions::default())
        .await
        .unwrap();
    let second = client
        .get_package(request, CallOptions::default())
        .await
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(calls.packages(), 1);
    assert_eq!(
        first.default_version().map(|v| v.version_key.version.as_str()),
        Some("2.0.0")
    );
}

/// Test that structurally equal requests share an entry
#[tokio::test]
async fn test_equal_requests_from_different_objects_share_entry() {
    let mock = MockInsightsClient::new();
    let calls = mock.counters();
    let client = CachedInsightsClient::new(mock);

    client
        .get_version(
            GetVersionRequest::new(System::Pypi, "requests", "2.31.0"),
            CallOptions::default(),
        )
        .await
        .unwrap();
    client
        .get_version(
            GetVersionRequest::from(VersionKey::new(System::Pypi, "requests", "2.31.0")),
            CallOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(calls.versions(), 1);
}

/// Test that names are not normalized before keying
#[tokio::test]
async fn test_distinct_keys_are_fetched_separately() {
    let mock = MockInsightsClient::new();
    let calls = mock.counters();
    let client = CachedInsightsClient::new(mock);

    for (system, name) in [
        (System::Pypi, "Django"),
        (System::Pypi, "django"),
        (System::Npm, "django"),
    ] {
        client
            .get_package(GetPackageRequest::new(system, name), CallOptions::default())
            .await
            .unwrap();
    }

    assert_eq!(calls.packages(), 3);
    assert_eq!(client.cache_stats().packages.entries, 3);
}

/// Test that versions and requirements of the same key are cached independently
#[tokio::test]
async fn test_version_and_requirements_caches_are_independent() {
    let mock = MockInsightsClient::new();
    let calls = mock.counters();
    let client = CachedInsightsClient::new(mock);

    let key = VersionKey::new(System::Npm, "react", "18.2.0");
    let version = client
        .get_version(GetVersionRequest::from(key.clone()), CallOptions::default())
        .await
        .unwrap();
    let requirements = client
        .get_requirements(
            GetRequirementsRequest::from(key.clone()),
            CallOptions::default(),
        )
        .await
        .unwrap();
    client
        .get_requirements(GetRequirementsRequest::from(key), CallOptions::default())
        .await
        .unwrap();

    assert_eq!(version.version_key.name, "react");
    assert_eq!(
        requirements.npm.as_ref().unwrap().dependencies.dependencies[0].name,
        "react-dep"
    );
    assert_eq!(calls.versions(), 1);
    assert_eq!(calls.requirements(), 1);

    let stats = client.cache_stats();
    assert_eq!(stats.versions.entries, 1);
    assert_eq!(stats.requirements.entries, 1);
    assert_eq!(stats.requirements.hits, 1);
    assert_eq!(stats.forwarded(), 2);
}

/// Test that failures are memoized like successes
#[tokio::test]
async fn test_errors_are_cached() {
    let mock = MockInsightsClient::new().failing_with(InsightsError::NotFound {
        resource: "npm/left-pad".to_string(),
    });
    let calls = mock.counters();
    let client = CachedInsightsClient::new(mock);

    for _ in 0..3 {
        let err = client
            .get_package(
                GetPackageRequest::new(System::Npm, "left-pad"),
                CallOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    assert_eq!(calls.packages(), 1, "a failed lookup is never retried");
}

/// Test that a request without an identifier is keyed like the default identifier
#[tokio::test]
async fn test_missing_identifier_uses_default_key() {
    let mock = MockInsightsClient::new();
    let calls = mock.counters();
    let client = CachedInsightsClient::new(mock);

    client
        .get_package(GetPackageRequest::default(), CallOptions::default())
        .await
        .unwrap();
    client
        .get_package(
            GetPackageRequest::from(PackageKey::default()),
            CallOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(calls.packages(), 1);
}

/// Test that a timeout from the first caller's options becomes the cached outcome
#[tokio::test]
async fn test_timeout_is_cached_for_key() {
    let mock = MockInsightsClient::new().with_delay(Duration::from_secs(5));
    let calls = mock.counters();
    let client = CachedInsightsClient::new(mock);

    let request = GetRequirementsRequest::new(System::Cargo, "tokio", "1.0.0");
    let err = client
        .get_requirements(
            request.clone(),
            CallOptions::default().with_timeout(Duration::from_millis(20)),
        )
        .await
        .unwrap_err();
    assert!(err.is_timeout());

    // A patient caller still receives the stored timeout
    let err = client
        .get_requirements(request, CallOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(calls.requirements(), 1);
}

/// Test that a caller giving up does not strand the others
#[tokio::test]
async fn test_abandoned_caller_does_not_block_waiters() {
    let mock = MockInsightsClient::new().with_delay(Duration::from_millis(50));
    let calls = mock.counters();
    let client = Arc::new(CachedInsightsClient::new(mock));

    let request = GetVersionRequest::new(System::Go, "github.com/google/uuid", "v1.6.0");

    let impatient = tokio::time::timeout(
        Duration::from_millis(5),
        client.get_version(request.clone(), CallOptions::default()),
    )
    .await;
    assert!(impatient.is_err(), "the first caller should give up");

    let version = client
        .get_version(request, CallOptions::default())
        .await
        .unwrap();
    assert_eq!(version.version_key.version, "v1.6.0");
    assert_eq!(calls.versions(), 1);
}
