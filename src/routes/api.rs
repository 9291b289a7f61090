// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for the admin dashboard (staff only).

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{DashboardStats, OrderSummary, User};
use crate::services::dashboard::{DEFAULT_RECENT_ORDERS_LIMIT, MAX_RECENT_ORDERS_LIMIT};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require staff authentication via JWT).
/// The auth and role middleware are applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/dashboard/stats", get(get_dashboard_stats))
        .route("/api/dashboard/orders/recent", get(get_recent_orders))
        .route("/api/dashboard/refresh", post(refresh_dashboard))
        .route("/api/users/{id}", get(get_user))
}

// ─── Dashboard Stats ─────────────────────────────────────────

/// Get dashboard statistics (cached, stale-while-revalidate).
async fn get_dashboard_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DashboardStats>> {
    tracing::debug!(user_id = %user.user_id, "Fetching dashboard stats");

    let stats = state.dashboard.stats().await?;
    Ok(Json((*stats).clone()))
}

// ─── Recent Orders ───────────────────────────────────────────

#[derive(Deserialize)]
struct RecentOrdersQuery {
    /// Number of orders to return (default 5, max 50)
    limit: Option<u32>,
}

/// Recent orders response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecentOrdersResponse {
    pub orders: Vec<OrderSummary>,
    pub limit: u32,
}

/// Get the most recent orders (cached per limit value).
async fn get_recent_orders(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<RecentOrdersQuery>,
) -> Result<Json<RecentOrdersResponse>> {
    if let Some(limit) = params.limit {
        if limit == 0 || limit > MAX_RECENT_ORDERS_LIMIT {
            return Err(crate::error::AppError::BadRequest(format!(
                "'limit' must be between 1 and {}",
                MAX_RECENT_ORDERS_LIMIT
            )));
        }
    }

    tracing::debug!(
        user_id = %user.user_id,
        limit = ?params.limit,
        "Fetching recent orders"
    );

    let orders = state.dashboard.recent_orders(params.limit).await?;

    Ok(Json(RecentOrdersResponse {
        limit: params.limit.unwrap_or(DEFAULT_RECENT_ORDERS_LIMIT),
        orders: (*orders).clone(),
    }))
}

// ─── Cache Refresh ───────────────────────────────────────────

/// Response for a manual dashboard refresh.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RefreshResponse {
    pub success: bool,
    /// Number of cached dashboard queries dropped
    pub entries_invalidated: u32,
}

/// Drop all cached dashboard queries so the next reads refetch.
async fn refresh_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<RefreshResponse>> {
    let entries_invalidated = state.dashboard.invalidate_all() as u32;

    tracing::info!(
        user_id = %user.user_id,
        entries_invalidated,
        "Dashboard cache invalidated on request"
    );

    Ok(Json(RefreshResponse {
        success: true,
        entries_invalidated,
    }))
}

// ─── Users ───────────────────────────────────────────────────

/// Get a user in view-model form (email unwrapped, role as label).
async fn get_user(
    State(state): State<Arc<AppState>>,
    Extension(requester): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<User>> {
    tracing::debug!(user_id = %requester.user_id, target = %id, "Fetching user");

    let api_user = state.commerce.get_user(&id).await?;
    Ok(Json(User::from_api(api_user)))
}
