// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod order;
pub mod stats;
pub mod user;

pub use order::OrderSummary;
pub use stats::DashboardStats;
pub use user::{ApiUser, User, UserRole};
