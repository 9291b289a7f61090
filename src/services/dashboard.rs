// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cached dashboard query accessors.
//!
//! Wraps the commerce client with per-query caches so dashboard reads hit
//! the upstream API at most once per staleness window:
//! - stats: fresh for 60 s, plus a 5-minute background refresh
//! - recent orders: fresh for 60 s, cached per `limit` value

use crate::cache::{KeyPart, QueryCache, QueryKey, QueryPolicy};
use crate::error::Result;
use crate::models::{DashboardStats, OrderSummary};
use crate::services::CommerceClient;
use std::sync::Arc;
use std::time::Duration;

/// How long fetched stats are served without refetching.
const STATS_STALE_SECS: u64 = 60;

/// Background refresh period for stats, independent of staleness.
const STATS_REFRESH_SECS: u64 = 5 * 60;

/// How long a fetched order list is served without refetching.
const RECENT_ORDERS_STALE_SECS: u64 = 60;

/// Orders returned when the request does not specify a limit.
pub const DEFAULT_RECENT_ORDERS_LIMIT: u32 = 5;

/// Upper bound on the recent-orders limit parameter.
pub const MAX_RECENT_ORDERS_LIMIT: u32 = 50;

fn stats_key() -> QueryKey {
    QueryKey::of(["dashboard", "stats"])
}

fn recent_orders_key(limit: u32) -> QueryKey {
    QueryKey::of(["dashboard", "recentOrders"]).with(limit)
}

/// Dashboard read service backed by the query cache.
///
/// Cheap to clone; clones share the same caches, so every request handler
/// sees one cache per query type.
#[derive(Clone)]
pub struct DashboardService {
    commerce: CommerceClient,
    stats_cache: QueryCache<DashboardStats>,
    orders_cache: QueryCache<Vec<OrderSummary>>,
}

impl DashboardService {
    pub fn new(commerce: CommerceClient) -> Self {
        Self {
            commerce,
            stats_cache: QueryCache::new(),
            orders_cache: QueryCache::new(),
        }
    }

    /// Dashboard statistics, cached for [`STATS_STALE_SECS`].
    pub async fn stats(&self) -> Result<Arc<DashboardStats>> {
        let policy = QueryPolicy::fresh_for(Duration::from_secs(STATS_STALE_SECS));
        let commerce = self.commerce.clone();

        self.stats_cache
            .fetch_with(stats_key(), policy, move || async move {
                commerce.get_stats().await
            })
            .await
    }

    /// Recent orders, cached for [`RECENT_ORDERS_STALE_SECS`].
    ///
    /// The limit is part of the cache key: distinct limits are cached
    /// independently and never share or invalidate one another.
    pub async fn recent_orders(&self, limit: Option<u32>) -> Result<Arc<Vec<OrderSummary>>> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_ORDERS_LIMIT);
        let policy = QueryPolicy::fresh_for(Duration::from_secs(RECENT_ORDERS_STALE_SECS));
        let commerce = self.commerce.clone();

        self.orders_cache
            .fetch_with(recent_orders_key(limit), policy, move || async move {
                commerce.get_recent_orders(limit).await
            })
            .await
    }

    /// Spawn the periodic stats refresh task. Call once at startup.
    pub fn spawn_stats_refresh(&self) -> tokio::task::JoinHandle<()> {
        let commerce = self.commerce.clone();
        self.stats_cache.spawn_refresh(
            stats_key(),
            Duration::from_secs(STATS_REFRESH_SECS),
            move || {
                let commerce = commerce.clone();
                async move { commerce.get_stats().await }
            },
        )
    }

    /// Drop every cached dashboard query so the next read refetches.
    /// Returns the number of entries removed.
    pub fn invalidate_all(&self) -> usize {
        let prefix = [KeyPart::from("dashboard")];
        self.stats_cache.invalidate_prefix(&prefix) + self.orders_cache.invalidate_prefix(&prefix)
    }
}
