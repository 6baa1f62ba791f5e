// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! # depscache
//!
//! A caching client for the [deps.dev](https://deps.dev) Insights API.
//!
//! Dependency scanners ask for the same packages over and over: every manifest
//! in a monorepo pulls in `react` or `serde`, and resolvers walk the same
//! transitive requirements many times. depscache answers each distinct lookup
//! once per process, no matter how many tasks ask for it concurrently.
//!
//! ## Building blocks
//!
//! - [`RequestCache`]: a generic single-flight memoizer. The first caller for a
//!   key runs the producer; everyone else, concurrent or later, shares its outcome.
//! - [`InsightsClient`]: the three Insights operations (`GetPackage`,
//!   `GetVersion`, `GetRequirements`) as an async trait.
//! - [`HttpInsightsClient`]: the deps.dev v3 REST transport.
//! - [`LoggingLayer`]: call tracing as a [`tower::Layer`].
//! - [`CachedInsightsClient`]: one [`RequestCache`] per operation in front of
//!   any [`InsightsClient`].
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use depscache::{CachedInsightsClient, CallOptions, ClientConfig, GetRequirementsRequest, InsightsClient, System};
//!
//! let client = CachedInsightsClient::connect(ClientConfig::from_env()?)?;
//!
//! let request = GetRequirementsRequest::new(System::Npm, "react", "18.2.0");
//! let requirements = client.get_requirements(request, CallOptions::default()).await?;
//!
//! println!("{}", client.cache_stats());
//! ```
//!
//! ## Caching semantics
//!
//! Outcomes are kept for the lifetime of the client, failures included: a
//! `NotFound` or a timeout for a key is returned to every later caller without
//! contacting the service again. Build a new client to start from a clean slate.

pub mod cache;
pub mod client;
pub mod config;
pub mod errors;
pub mod keys;
mod spans;
pub mod transport;
pub mod types;

pub use cache::{CacheStats, ProducerPanic, RequestCache};
pub use client::{
    CachedInsightsClient, CallOptions, DefaultCachedClient, HttpInsightsClient,
    InsightsCacheStats, InsightsClient,
};
pub use config::ClientConfig;
pub use errors::InsightsError;
pub use keys::{PackageCacheKey, VersionCacheKey};
pub use transport::{LoggingClient, LoggingLayer};
pub use types::*;
