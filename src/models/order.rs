// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Order summaries for the recent-orders dashboard widget.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A single order row as listed on the dashboard.
///
/// Pass-through shape: deserialized from the commerce API and re-served
/// to the frontends unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct OrderSummary {
    pub id: String,
    /// Human-facing order number ("SO-2024-0042")
    pub order_number: String,
    pub customer_name: String,
    /// Order total, in minor currency units (cents)
    pub total_cents: u64,
    /// Fulfilment status as reported upstream ("pending", "shipped", ...)
    pub status: String,
    pub created_at: String,
}
