//! Dashboard statistics aggregates.
//!
//! The commerce API pre-computes these; the BFF passes the shape through
//! and only adds caching, so wire and view formats are the same struct.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Aggregate statistics shown on the admin dashboard landing page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardStats {
    /// Gross revenue, in minor currency units (cents)
    #[serde(default)]
    pub total_revenue_cents: u64,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub total_customers: u64,
    #[serde(default)]
    pub total_products: u64,
    /// Orders awaiting fulfilment
    #[serde(default)]
    pub pending_orders: u64,
    /// When the commerce API computed these aggregates (ISO 8601)
    #[serde(default)]
    pub computed_at: String,
}
