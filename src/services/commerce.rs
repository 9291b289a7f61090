// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Commerce API client.
//!
//! Handles:
//! - Dashboard statistics and recent-order fetches
//! - User record lookup (wire format, mapped to the view model by callers)
//! - Rate limit detection on upstream 429s

use crate::error::AppError;
use crate::models::{ApiUser, DashboardStats, OrderSummary};
use serde::Deserialize;

/// Commerce API client.
#[derive(Clone)]
pub struct CommerceClient {
    http: reqwest::Client,
    base_url: String,
    service_token: String,
}

impl CommerceClient {
    /// Create a new client with the upstream base URL and service token.
    pub fn new(base_url: String, service_token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            service_token,
        }
    }

    /// Get pre-computed dashboard statistics.
    pub async fn get_stats(&self) -> Result<DashboardStats, AppError> {
        let url = format!("{}/admin/stats", self.base_url);
        self.get_json(&url, &[]).await
    }

    /// List the most recent orders.
    pub async fn get_recent_orders(&self, limit: u32) -> Result<Vec<OrderSummary>, AppError> {
        let url = format!("{}/admin/orders/recent", self.base_url);
        self.get_json(&url, &[("limit", limit.to_string())]).await
    }

    /// Get a user record by ID (wire format).
    pub async fn get_user(&self, user_id: &str) -> Result<ApiUser, AppError> {
        let url = format!("{}/admin/users/{}", self.base_url, user_id);
        self.get_json(&url, &[]).await
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.service_token)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::CommerceApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("Commerce API rate limit hit (429)");
                return Err(AppError::CommerceApi(
                    AppError::COMMERCE_RATE_LIMIT.to_string(),
                ));
            }

            // Service token rejected or rotated out from under us
            if status.as_u16() == 401 {
                return Err(AppError::CommerceApi(
                    AppError::COMMERCE_TOKEN_ERROR.to_string(),
                ));
            }

            if status.as_u16() == 404 {
                return Err(AppError::NotFound(format!("Upstream resource: {}", body)));
            }

            return Err(AppError::CommerceApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::CommerceApi(format!("Invalid JSON response: {}", e)))
    }
}
