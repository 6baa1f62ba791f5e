// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Single-flight memoizing cache for fallible async requests
//!
//! Every key owns one shared, one-shot outcome. The first caller for a key
//! inserts the entry and schedules its producer; every other caller, whether it
//! arrives while the producer is running or long after it settled, awaits the
//! same outcome. Failures are memoized exactly like successes.

use std::any::Any;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use tokio::runtime::Handle;
use tracing::{debug, trace, warn, Instrument, Span};

use super::CacheStats;

/// Outcome shared by the producer and every waiter of one key.
type SharedOutcome<V, E> = Shared<BoxFuture<'static, Result<V, E>>>;

/// A producer panicked instead of returning an outcome.
///
/// The panic is caught and converted into the cache's error type through
/// `From<ProducerPanic>`, so waiters observe a regular error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("request producer panicked: {message}")]
pub struct ProducerPanic {
    message: String,
}

impl ProducerPanic {
    /// Creates a producer panic with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The panic message, when the payload was a string.
    pub fn message(&self) -> &str {
        &self.message
    }

    fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&'static str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self { message }
    }
}

/// Keyed single-flight memoizer
///
/// Stores one outcome per key, keyed by structural equality of `K`.
///
/// # Type Parameters
///
/// * `K` - The key type (must be `Eq + Hash + Clone`)
/// * `V` - The cached value; cloned for every caller, so prefer `Arc<T>` payloads
/// * `E` - The error type; cloned for every caller and able to represent a
///   panicking producer via `From<ProducerPanic>`
///
/// # Guarantees
///
/// - For a given key the producer runs at most once, ever
/// - Concurrent and later callers receive a clone of that single outcome
/// - A panicking producer still settles its entry, so no waiter blocks forever
/// - The structural lock is held only for the map lookup/insert, never while a
///   producer runs, so unrelated keys never wait on each other
///
/// # Cancellation
///
/// The cache does not track cancellation. Dropping a caller's future only stops
/// that caller from waiting. When a key is first requested inside a tokio
/// runtime, its producer is also spawned onto that runtime, so it runs to
/// completion even if every caller gives up. Outside a runtime the producer is
/// driven only by its waiters and resumes when the next caller for the key
/// arrives.
pub struct RequestCache<K, V, E> {
    entries: Mutex<HashMap<K, SharedOutcome<V, E>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    panics: Arc<AtomicU64>,
}

impl<K, V, E> Default for RequestCache<K, V, E> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            panics: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl<K, V, E> fmt::Debug for RequestCache<K, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self
            .entries
            .lock()
            .map(|entries| entries.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len());
        f.debug_struct("RequestCache")
            .field("entries", &entries)
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

impl<K, V, E> RequestCache<K, V, E>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + 'static,
    V: Clone + Send + Sync + 'static,
    E: Clone + From<ProducerPanic> + Send + Sync + 'static,
{
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the outcome for `key`, running `produce` only if no entry exists
    ///
    /// If another caller already created the entry, `produce` is dropped without
    /// being called and this call waits for (or immediately reads) the stored
    /// outcome. Errors from the producer are returned unchanged to every caller.
    pub async fn get<F, Fut>(&self, key: K, produce: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let outcome = self.entry_for(key, produce);
        outcome.await
    }

    /// Returns the settled outcome for `key` without producing or waiting
    ///
    /// Returns `None` if the key was never requested or its producer is still
    /// in flight.
    pub fn peek(&self, key: &K) -> Option<Result<V, E>> {
        self.lock_entries()
            .get(key)
            .and_then(|outcome| outcome.peek().cloned())
    }

    /// Whether an entry (settled or in flight) exists for `key`
    pub fn contains(&self, key: &K) -> bool {
        self.lock_entries().contains_key(key)
    }

    /// Number of keys ever requested
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    /// Check if no key was ever requested
    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    /// Returns current cache statistics
    pub fn stats(&self) -> CacheStats {
        let entries = self.lock_entries();
        let settled = entries
            .values()
            .filter(|outcome| outcome.peek().is_some())
            .count();

        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            panics: self.panics.load(Ordering::Relaxed),
            entries: entries.len(),
            in_flight: entries.len() - settled,
        }
    }

    /// Looks up or creates the shared outcome for `key`
    ///
    /// The guard is released when this returns, before anyone awaits the outcome.
    fn entry_for<F, Fut>(&self, key: K, produce: F) -> SharedOutcome<V, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let (outcome, created) = {
            let mut entries = self.lock_entries();
            let found = match entries.entry(key) {
                Entry::Occupied(entry) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    trace!(key = ?entry.key(), "request cache hit");
                    (entry.get().clone(), false)
                }
                Entry::Vacant(entry) => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    debug!(key = ?entry.key(), "request cache miss, scheduling producer");
                    let outcome = settle(entry.key().clone(), produce, Arc::clone(&self.panics));
                    entry.insert(outcome.clone());
                    (outcome, true)
                }
            };
            found
        };

        if created {
            drive(&outcome);
        }
        outcome
    }

    // Every critical section is a single map operation, so a poisoned map is
    // still consistent.
    fn lock_entries(&self) -> MutexGuard<'_, HashMap<K, SharedOutcome<V, E>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps a new outcome running to completion on the current tokio runtime
///
/// Without a runtime the outcome is only driven by the callers awaiting it.
fn drive<V, E>(outcome: &SharedOutcome<V, E>)
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    if let Ok(runtime) = Handle::try_current() {
        runtime.spawn(outcome.clone().instrument(Span::current()));
    }
}

/// Wraps `produce` into the one-shot outcome stored for `key`.
///
/// `produce` is only called once the outcome is first polled, outside the
/// structural lock. Panics, including ones raised synchronously by `produce`
/// itself, settle the outcome as `E::from(ProducerPanic)`.
fn settle<K, V, E, F, Fut>(key: K, produce: F, panics: Arc<AtomicU64>) -> SharedOutcome<V, E>
where
    K: fmt::Debug + Send + 'static,
    V: Clone + Send + Sync + 'static,
    E: Clone + From<ProducerPanic> + Send + Sync + 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<V, E>> + Send + 'static,
{
    async move {
        match AssertUnwindSafe(async move { produce().await })
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(payload) => {
                let panic = ProducerPanic::from_payload(payload);
                panics.fetch_add(1, Ordering::Relaxed);
                warn!(key = ?key, error = %panic, "request cache producer panicked");
                Err(E::from(panic))
            }
        }
    }
    .boxed()
    .shared()
}
