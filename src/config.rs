use crate::domain::errors::DashboardError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "/api/stock-data";
/// Five minutes.
pub const DEFAULT_REFRESH_INTERVAL_MS: u32 = 300_000;
pub const DEFAULT_CHART_WIDTH: u32 = 960;
pub const DEFAULT_CHART_HEIGHT: u32 = 500;

/// Settings a host page may pass to `mount_dashboard`. Every field is
/// optional in the incoming object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardConfig {
    pub endpoint: String,
    pub refresh_interval_ms: u32,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            chart_width: DEFAULT_CHART_WIDTH,
            chart_height: DEFAULT_CHART_HEIGHT,
        }
    }
}

impl DashboardConfig {
    pub fn from_json(json: &str) -> Result<Self, DashboardError> {
        let config: DashboardConfig =
            serde_json::from_str(json).map_err(|e| DashboardError::InvalidConfig(e.to_string()))?;
        config.validate()
    }

    pub fn validate(self) -> Result<Self, DashboardError> {
        if self.endpoint.trim().is_empty() {
            return Err(DashboardError::InvalidConfig("endpoint must not be empty".to_string()));
        }
        if self.refresh_interval_ms == 0 {
            return Err(DashboardError::InvalidConfig(
                "refreshIntervalMs must be greater than zero".to_string(),
            ));
        }
        if self.chart_width == 0 || self.chart_height == 0 {
            return Err(DashboardError::InvalidConfig(format!(
                "chart size {}x{} is empty",
                self.chart_width, self.chart_height
            )));
        }
        Ok(self)
    }
}
