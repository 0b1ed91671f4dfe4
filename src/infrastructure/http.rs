use crate::config::DashboardConfig;
use crate::domain::errors::{FetchFailure, FetchResult};
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::market_data::{StockDataSource, StockPayload};
use gloo_net::http::Request;

/// HTTP client for the dashboard's stock-data endpoint
#[derive(Debug, Clone)]
pub struct StockApiClient {
    endpoint: String,
}

impl Default for StockApiClient {
    fn default() -> Self {
        Self::from_config(&DashboardConfig::default())
    }
}

impl StockApiClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into() }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.endpoint.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl StockDataSource for StockApiClient {
    async fn fetch_stock_data(&self) -> FetchResult<StockPayload> {
        get_logger().debug(
            LogComponent::Infrastructure("StockApi"),
            &format!("📡 GET {}", self.endpoint),
        );

        let response = Request::get(&self.endpoint)
            .send()
            .await
            .map_err(|e| FetchFailure::Network(e.to_string()))?;

        if !response.ok() {
            return Err(FetchFailure::HttpStatus {
                status: response.status(),
                status_text: response.status_text(),
            });
        }

        // Body read errors are transport errors; only serde failures are Decode
        let body = response.text().await.map_err(|e| FetchFailure::Network(e.to_string()))?;
        let payload = StockPayload::from_json(&body)?;

        get_logger().debug(
            LogComponent::Infrastructure("StockApi"),
            &format!(
                "✅ Received {} indices, {} candles",
                payload.current.len(),
                payload.historical.len()
            ),
        );
        Ok(payload)
    }
}
