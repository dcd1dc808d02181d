//! HTTP client for the inventory service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::core::Config;
use crate::inventory::{InventoryApi, InventoryError, InventoryResult};
use shared::models::{Product, StockAdjustment};
use shared::response::ApiResponse;

/// Base delay for retry backoff; doubles per attempt
const RETRY_BACKOFF_BASE: Duration = Duration::from_millis(100);

/// Stock delta payload: `PATCH /products/{id}/stock`
#[derive(Debug, Serialize)]
struct StockUpdateRequest {
    quantity: i64,
}

/// HTTP client for the inventory service
///
/// Every call carries the configured per-request timeout, and transient
/// failures (transport errors, upstream 5xx) are retried a bounded number
/// of times with exponential backoff. Retry exhaustion surfaces as the
/// last error; callers treat that as "call failed".
#[derive(Debug, Clone)]
pub struct HttpInventoryClient {
    client: Client,
    base_url: String,
    retries: u32,
}

impl HttpInventoryClient {
    /// Create a new client from configuration
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.inventory_timeout_ms))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.inventory_url.trim_end_matches('/').to_string(),
            retries: config.inventory_retries,
        }
    }

    fn product_url(&self, product_id: &str) -> String {
        format!("{}/products/{}", self.base_url, product_id)
    }

    fn stock_url(&self, product_id: &str) -> String {
        format!("{}/products/{}/stock", self.base_url, product_id)
    }

    /// Whether an error is worth another attempt
    fn is_transient(error: &InventoryError) -> bool {
        match error {
            InventoryError::Request(e) => e.is_timeout() || e.is_connect(),
            InventoryError::Upstream { status, .. } => *status >= 500,
        }
    }

    async fn try_fetch(&self, url: &str) -> InventoryResult<Option<Product>> {
        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let status = response.status();
        if !status.is_success() {
            return Err(InventoryError::Upstream {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: ApiResponse<Product> = response.json().await?;
        Ok(body.into_data())
    }

    async fn try_adjust(&self, url: &str, delta: i64) -> InventoryResult<()> {
        let response = self
            .client
            .patch(url)
            .json(&StockUpdateRequest { quantity: delta })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(InventoryError::Upstream {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl InventoryApi for HttpInventoryClient {
    async fn fetch_product(&self, product_id: &str) -> InventoryResult<Option<Product>> {
        let url = self.product_url(product_id);
        let mut attempt = 0u32;

        loop {
            match self.try_fetch(&url).await {
                Err(e) if attempt < self.retries && Self::is_transient(&e) => {
                    attempt += 1;
                    tracing::warn!(
                        product_id,
                        attempt,
                        error = %e,
                        "Product fetch failed, retrying"
                    );
                    tokio::time::sleep(RETRY_BACKOFF_BASE * 2u32.pow(attempt - 1)).await;
                }
                other => return other,
            }
        }
    }

    async fn adjust_stock(&self, adjustment: &StockAdjustment) -> InventoryResult<()> {
        let url = self.stock_url(&adjustment.product_id);
        let mut attempt = 0u32;

        loop {
            match self.try_adjust(&url, adjustment.quantity).await {
                Err(e) if attempt < self.retries && Self::is_transient(&e) => {
                    attempt += 1;
                    tracing::warn!(
                        product_id = %adjustment.product_id,
                        delta = adjustment.quantity,
                        attempt,
                        error = %e,
                        "Stock adjustment failed, retrying"
                    );
                    tokio::time::sleep(RETRY_BACKOFF_BASE * 2u32.pow(attempt - 1)).await;
                }
                other => return other,
            }
        }
    }
}
