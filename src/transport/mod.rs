// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Middleware layers for Insights clients.
//!
//! Layers implement [`tower::Layer`] over any [`InsightsClient`](crate::InsightsClient),
//! so they compose the same way as Tower service stacks.
//!
//! # Logging
//!
//! The [`LoggingLayer`] wraps every call in a `depscache.insights_call` span and
//! records its duration. Failures are logged at `warn`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use depscache::{CachedInsightsClient, ClientConfig, HttpInsightsClient, LoggingLayer};
//! use tower::Layer;
//!
//! let transport = HttpInsightsClient::new(&ClientConfig::deps_dev())?;
//!
//! // Log below the cache to see only calls that reach the service
//! let client = CachedInsightsClient::new(LoggingLayer::new().layer(transport));
//! ```

mod logging;

pub use logging::{LoggingClient, LoggingLayer};
