// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Span creation helpers for depscache operations.
//!
//! Telemetry is kept out of business logic: each instrumented operation has a
//! corresponding span helper here, and callers attach it with
//! [`tracing::Instrument`]:
//!
//! ```rust,ignore
//! pub async fn my_operation(&self, key: &Key) -> Result<T> {
//!     async { /* business logic */ }
//!         .instrument(spans::my_operation(key))
//!         .await
//! }
//! ```

use std::fmt::Display;

use tracing::{Level, Span};

/// Create span for a call that reaches the wrapped Insights client.
///
/// `duration_ms` is recorded when the call completes.
///
/// Parent: cached_lookup span, when called through the cache
/// Children: HTTP request spans from the transport
#[inline]
pub(crate) fn insights_call(method: &'static str, key: &impl Display) -> Span {
    tracing::span!(
        Level::INFO,
        "depscache.insights_call",
        method = method,
        key = %key,
        duration_ms = tracing::field::Empty,
    )
}

/// Create span for a lookup answered by one of the request caches.
///
/// Parent: caller's span
/// Children: the insights_call span of the forwarded call, opened under whichever
/// lookup first polls the producer (normally the one that created the entry).
/// Lookups joining an entry that is already in flight get no child span.
#[inline]
pub(crate) fn cached_lookup(cache: &'static str, key: &impl Display) -> Span {
    tracing::debug_span!("depscache.cached_lookup", cache = cache, key = %key)
}

/// Create span for a single HTTP request to the Insights REST API.
#[inline]
pub(crate) fn http_request(url: &url::Url) -> Span {
    tracing::trace_span!("depscache.http_request", url = %url, status = tracing::field::Empty)
}
