// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

/// Example demonstrating deduplicated requirement lookups against deps.dev
///
/// This example shows how to:
/// 1. Build the default caching client from environment configuration
/// 2. Resolve a package's default version
/// 3. Fire many concurrent lookups for the same requirements
/// 4. Inspect cache statistics to confirm only one request reached the service
///
/// Run with:
/// ```bash
/// SYSTEM=npm \
/// PACKAGE=react \
/// RUST_LOG=depscache=debug \
/// cargo run --example fetch_requirements
/// ```
///
/// `DEPSDEV_BASE_URL`, `DEPSDEV_USER_AGENT` and `DEPSDEV_TIMEOUT_SECS` override
/// the client configuration.
use anyhow::{Context, Result};
use depscache::{
    CachedInsightsClient, CallOptions, ClientConfig, GetPackageRequest, GetRequirementsRequest,
    InsightsClient, System,
};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONCURRENT_LOOKUPS: usize = 16;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let system: System = env::var("SYSTEM")
        .unwrap_or_else(|_| "npm".to_string())
        .parse()
        .context("SYSTEM must name a deps.dev package system")?;
    let name = env::var("PACKAGE").unwrap_or_else(|_| "react".to_string());

    let client = CachedInsightsClient::connect(ClientConfig::from_env()?)?;

    let package = client
        .get_package(GetPackageRequest::new(system, &name), CallOptions::default())
        .await
        .with_context(|| format!("Failed to fetch package {system}/{name}"))?;
    let version = package
        .default_version()
        .context("Package has no default version")?
        .version_key
        .clone();

    info!(
        package = %name,
        version = %version.version,
        versions = package.versions.len(),
        "Resolved default version"
    );

    let lookups = (0..CONCURRENT_LOOKUPS).map(|_| {
        client.get_requirements(
            GetRequirementsRequest::from(version.clone()),
            CallOptions::default(),
        )
    });
    let results = futures::future::join_all(lookups).await;

    let requirements = results
        .into_iter()
        .next()
        .context("No lookups were made")?
        .context("Failed to fetch requirements")?;

    println!("\n=== {system}/{name}@{} ===", version.version);
    match &requirements.npm {
        Some(npm) => {
            for dependency in npm.dependencies.all() {
                println!("{} {}", dependency.name, dependency.requirement);
            }
        }
        None if requirements.is_empty() => println!("(no requirements reported)"),
        None => println!("{}", serde_json::to_string_pretty(&*requirements)?),
    }

    println!("\n=== Cache ===");
    println!("{}", client.cache_stats());

    Ok(())
}
