#![cfg(target_arch = "wasm32")]
use stock_dashboard_wasm::config::{DEFAULT_REFRESH_INTERVAL_MS, DashboardConfig};
use stock_dashboard_wasm::domain::errors::DashboardError;
use stock_dashboard_wasm::presentation::wasm_api::config_from_js;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn js_object(json: &str) -> JsValue {
    js_sys::JSON::parse(json).unwrap()
}

#[wasm_bindgen_test]
fn missing_config_means_defaults() {
    assert_eq!(config_from_js(&JsValue::UNDEFINED), Ok(DashboardConfig::default()));
    assert_eq!(config_from_js(&JsValue::NULL), Ok(DashboardConfig::default()));
}

#[wasm_bindgen_test]
fn partial_object_overrides_named_fields() {
    let config = config_from_js(&js_object(r#"{"endpoint": "/mock/stocks"}"#)).unwrap();
    assert_eq!(config.endpoint, "/mock/stocks");
    assert_eq!(config.refresh_interval_ms, DEFAULT_REFRESH_INTERVAL_MS);
}

#[wasm_bindgen_test]
fn invalid_values_are_rejected() {
    assert!(matches!(
        config_from_js(&js_object(r#"{"refreshIntervalMs": 0}"#)),
        Err(DashboardError::InvalidConfig(_))
    ));
    assert!(matches!(
        config_from_js(&js_object(r#"{"chartWidth": "wide"}"#)),
        Err(DashboardError::InvalidConfig(_))
    ));
}
