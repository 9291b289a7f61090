// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::Arc;
use storefront_api::config::Config;
use storefront_api::routes::create_router;
use storefront_api::services::{CommerceClient, DashboardService};
use storefront_api::AppState;

/// Create a test app with an unreachable upstream.
///
/// Auth and validation behavior can be exercised fully; handlers that
/// reach the commerce API will fail with 502, never 401/403.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::default();

    let commerce = CommerceClient::new(
        config.commerce_api_url.clone(),
        config.commerce_api_token.clone(),
    );
    let dashboard = DashboardService::new(commerce.clone());

    let state = Arc::new(AppState {
        config,
        commerce,
        dashboard,
    });

    (create_router(state.clone()), state)
}
