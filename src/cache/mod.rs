// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! In-process request caching.
//!
//! This module provides the single-flight [`RequestCache`] used by
//! [`CachedInsightsClient`](crate::CachedInsightsClient) to deduplicate
//! deps.dev lookups:
//!
//! - **Single flight**: concurrent requests for the same key share one producer
//! - **Sticky outcomes**: successes and failures are both memoized
//! - **No eviction**: entries live as long as the cache itself
//!
//! # Examples
//!
//! ```rust,ignore
//! use depscache::cache::RequestCache;
//! use std::sync::Arc;
//!
//! let cache: RequestCache<String, Arc<String>, MyError> = RequestCache::new();
//! let value = cache
//!     .get("left-pad".to_string(), || async { Ok(Arc::new(fetch().await?)) })
//!     .await?;
//! ```

use serde::Serialize;
use std::fmt;

mod request;

pub use request::{ProducerPanic, RequestCache};

/// Statistics about request cache usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of lookups that found an existing entry (settled or in flight)
    pub hits: u64,
    /// Number of lookups that created an entry and scheduled its producer
    pub misses: u64,
    /// Number of producers that panicked instead of returning
    pub panics: u64,
    /// Current number of entries in the cache
    pub entries: usize,
    /// Entries whose producer has not settled yet
    pub in_flight: usize,
}

impl CacheStats {
    /// Calculates the cache hit rate as a percentage (0.0 to 100.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={}, misses={}, panics={}, entries={}, in_flight={}, hit_rate={:.1}%",
            self.hits,
            self.misses,
            self.panics,
            self.entries,
            self.in_flight,
            self.hit_rate()
        )
    }
}
