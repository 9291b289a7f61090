// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storefront API Server
//!
//! Serves the storefront and admin dashboard frontends, caching dashboard
//! queries against the upstream commerce API.

use std::sync::Arc;
use storefront_api::{
    config::Config,
    services::{CommerceClient, DashboardService},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Storefront API");

    // Initialize the commerce API client
    let commerce = CommerceClient::new(
        config.commerce_api_url.clone(),
        config.commerce_api_token.clone(),
    );
    tracing::info!(upstream = %config.commerce_api_url, "Commerce client initialized");

    // Initialize the dashboard query cache service
    let dashboard = DashboardService::new(commerce.clone());

    // Periodic stats refresh, independent of request traffic
    dashboard.spawn_stats_refresh();
    tracing::info!("Dashboard stats refresh task spawned");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        commerce,
        dashboard,
    });

    // Build router
    let app = storefront_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("storefront_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
