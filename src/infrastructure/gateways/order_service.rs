use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::application::usecases::order_receipts::OrderGateway;

/// Minimal order-service client built on reqwest.
pub struct OrderServiceClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OrderServiceClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        error!(
            status = %status,
            response_body = %body,
            context = %context,
            "order service request failed"
        );

        anyhow::bail!(
            "order service request failed: {} (status {})",
            context,
            status
        );
    }
}

#[async_trait]
impl OrderGateway for OrderServiceClient {
    async fn mark_order_paid(&self, order_id: Uuid) -> Result<()> {
        let url = format!("{}/internal/orders/{}/payment-status", self.base_url, order_id);

        let resp = self
            .http
            .patch(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&json!({ "payment_status": "paid" }))
            .send()
            .await?;
        Self::ensure_success(resp, "mark order paid").await?;

        Ok(())
    }
}
