use gloo::utils::format::JsValueSerdeExt;
use wasm_bindgen::prelude::*;

use crate::app::Dashboard;
use crate::config::DashboardConfig;
use crate::domain::errors::DashboardError;
use crate::domain::logging::LogComponent;
use crate::{log_info, log_warn};

/// Decode the optional JS configuration object. `undefined` and `null` mean
/// "use the defaults".
pub fn config_from_js(value: &JsValue) -> Result<DashboardConfig, DashboardError> {
    if value.is_undefined() || value.is_null() {
        return Ok(DashboardConfig::default());
    }
    value
        .into_serde::<DashboardConfig>()
        .map_err(|e| DashboardError::InvalidConfig(e.to_string()))?
        .validate()
}

/// Mount the dashboard into `<body>`.
///
/// ```js
/// mount_dashboard({ endpoint: "/api/stock-data", refreshIntervalMs: 300000 });
/// ```
#[wasm_bindgen]
pub fn mount_dashboard(config: JsValue) {
    let config = config_from_js(&config).unwrap_or_else(|e| {
        log_warn!(
            LogComponent::Presentation("WasmApi"),
            "⚠️ {}, falling back to defaults",
            e
        );
        DashboardConfig::default()
    });

    log_info!(
        LogComponent::Presentation("WasmApi"),
        "📊 Mounting dashboard: {} every {} ms",
        config.endpoint,
        config.refresh_interval_ms
    );

    leptos::mount_to_body(move || leptos::view! { <Dashboard config=config/> });
}
