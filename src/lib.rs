// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Storefront API: backend-for-frontend for the storefront and admin
//! dashboard.
//!
//! This crate fronts the upstream commerce API, mapping wire records to
//! the view models the frontends consume and caching dashboard queries
//! with stale-while-revalidate semantics.

pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::{CommerceClient, DashboardService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub commerce: CommerceClient,
    pub dashboard: DashboardService,
}
