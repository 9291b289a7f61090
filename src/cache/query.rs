// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Keyed query cache with stale-while-revalidate semantics.
//!
//! A `QueryCache` maps composite keys to fetched values. Reads go through
//! [`QueryCache::fetch_with`], which:
//! - returns the cached value while it is fresh, without fetching
//! - deduplicates concurrent fetches for the same key (one in-flight
//!   fetch per key, other callers wait and reuse its result)
//! - serves the previous value when a refetch fails
//!
//! Periodic background refresh for a key is available via
//! [`QueryCache::spawn_refresh`], independent of the staleness window.

use crate::error::Result;
use dashmap::DashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, MissedTickBehavior};

/// One component of a composite cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    Str(String),
    Num(u64),
}

impl From<&str> for KeyPart {
    fn from(s: &str) -> Self {
        KeyPart::Str(s.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(s: String) -> Self {
        KeyPart::Str(s)
    }
}

impl From<u64> for KeyPart {
    fn from(n: u64) -> Self {
        KeyPart::Num(n)
    }
}

impl From<u32> for KeyPart {
    fn from(n: u32) -> Self {
        KeyPart::Num(u64::from(n))
    }
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Str(s) => f.write_str(s),
            KeyPart::Num(n) => write!(f, "{}", n),
        }
    }
}

/// Composite cache key: an ordered tuple of parts.
///
/// Keys are compared on the full tuple, so `["dashboard","recentOrders",5]`
/// and `["dashboard","recentOrders",10]` are independent entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<KeyPart>);

impl QueryKey {
    /// Build a key from uniform parts: `QueryKey::of(["dashboard", "stats"])`.
    pub fn of<P, I>(parts: I) -> Self
    where
        P: Into<KeyPart>,
        I: IntoIterator<Item = P>,
    {
        QueryKey(parts.into_iter().map(Into::into).collect())
    }

    /// Append a part (for parameterized keys).
    pub fn with(mut self, part: impl Into<KeyPart>) -> Self {
        self.0.push(part.into());
        self
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }

    /// Whether this key begins with the given parts.
    pub fn starts_with(&self, prefix: &[KeyPart]) -> bool {
        self.0.len() >= prefix.len() && self.0[..prefix.len()] == *prefix
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

/// Freshness policy for a query.
#[derive(Debug, Clone, Copy)]
pub struct QueryPolicy {
    /// Window after a fetch during which the cached value is served
    /// without refetching.
    pub stale_after: Duration,
}

impl QueryPolicy {
    pub fn fresh_for(stale_after: Duration) -> Self {
        Self { stale_after }
    }
}

/// Cached value plus the instant it was fetched.
struct CacheEntry<T> {
    value: Arc<T>,
    fetched_at: Instant,
}

impl<T> Clone for CacheEntry<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            fetched_at: self.fetched_at,
        }
    }
}

/// Concurrent keyed cache for one value type.
///
/// Cheap to clone; clones share the same underlying maps (same pattern as
/// sharing a token cache across service instances).
pub struct QueryCache<T> {
    entries: Arc<DashMap<QueryKey, CacheEntry<T>>>,
    /// Per-key mutex to serialize fetches for the same key.
    fetch_locks: Arc<DashMap<QueryKey, Arc<Mutex<()>>>>,
}

impl<T> Clone for QueryCache<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            fetch_locks: self.fetch_locks.clone(),
        }
    }
}

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> QueryCache<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            fetch_locks: Arc::new(DashMap::new()),
        }
    }

    /// Drop a single entry. Returns whether an entry existed.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        self.fetch_locks.remove(key);
        self.entries.remove(key).is_some()
    }

    /// Drop every entry whose key starts with `prefix`. Returns the number
    /// of entries removed.
    pub fn invalidate_prefix(&self, prefix: &[KeyPart]) -> usize {
        let before = self.entries.len();
        self.entries.retain(|k, _| !k.starts_with(prefix));
        self.fetch_locks.retain(|k, _| !k.starts_with(prefix));
        before.saturating_sub(self.entries.len())
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Send + Sync + 'static> QueryCache<T> {
    /// Read through the cache.
    ///
    /// 1. Fresh cached value: returned immediately, `fetch` is not called.
    /// 2. Otherwise acquire the per-key fetch lock and re-check: a caller
    ///    that waited here reuses the value the lock holder fetched.
    /// 3. Run `fetch`. On success the value is cached and returned. On
    ///    failure a stale value, if present, is served; a cold key
    ///    propagates the error unchanged.
    pub async fn fetch_with<F, Fut>(
        &self,
        key: QueryKey,
        policy: QueryPolicy,
        fetch: F,
    ) -> Result<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        // Fast path: fresh hit, no lock, no I/O
        if let Some(entry) = self.entries.get(&key) {
            if entry.fetched_at.elapsed() < policy.stale_after {
                return Ok(entry.value.clone());
            }
            // Stale, fall through to refetch
        }

        // One in-flight fetch per key; other callers queue here
        let lock = self
            .fetch_locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        // Re-check after acquiring the lock: the previous holder may have
        // fetched while we waited.
        if let Some(entry) = self.entries.get(&key) {
            if entry.fetched_at.elapsed() < policy.stale_after {
                return Ok(entry.value.clone());
            }
        }

        match fetch().await {
            Ok(value) => {
                let value = Arc::new(value);
                self.entries.insert(
                    key,
                    CacheEntry {
                        value: value.clone(),
                        fetched_at: Instant::now(),
                    },
                );
                Ok(value)
            }
            Err(err) => {
                // Stale-while-revalidate: keep serving the previous value
                // when the refetch fails.
                if let Some(entry) = self.entries.get(&key) {
                    tracing::warn!(
                        key = %key,
                        error = %err,
                        "Refetch failed, serving stale cached value"
                    );
                    return Ok(entry.value.clone());
                }
                Err(err)
            }
        }
    }

    /// Spawn a task refetching `key` every `every`, regardless of
    /// staleness. A failed refresh keeps the current cached value.
    pub fn spawn_refresh<F, Fut>(
        &self,
        key: QueryKey,
        every: Duration,
        fetch: F,
    ) -> tokio::task::JoinHandle<()>
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately; the initial fetch is the
            // caller's first read, not ours.
            interval.tick().await;

            loop {
                interval.tick().await;
                match fetch().await {
                    Ok(value) => {
                        cache.entries.insert(
                            key.clone(),
                            CacheEntry {
                                value: Arc::new(value),
                                fetched_at: Instant::now(),
                            },
                        );
                        tracing::debug!(key = %key, "Background refresh completed");
                    }
                    Err(err) => {
                        tracing::warn!(
                            key = %key,
                            error = %err,
                            "Background refresh failed, keeping cached value"
                        );
                    }
                }
            }
        })
    }
}
